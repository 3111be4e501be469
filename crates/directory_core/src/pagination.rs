/// Upper bound on numbered page buttons shown at once.
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// Page numbers to show as buttons: a window of at most [`MAX_PAGE_BUTTONS`]
/// centred on `current`, shifted inward near either end of `1..=total`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let span = MAX_PAGE_BUTTONS - 1;

    let mut start = current.saturating_sub(MAX_PAGE_BUTTONS / 2).max(1);
    let end = total.min(start + span);
    if end - start < span {
        start = end.saturating_sub(span).max(1);
    }
    (start..=end).collect()
}

pub fn prev_enabled(current: u32) -> bool {
    current > 1
}

pub fn next_enabled(current: u32, total: u32) -> bool {
    current < total
}

//! Terminal input lines to controller messages.
use directory_core::Msg;

pub const HELP: &str = "\
commands:
  type <text>       edit the search box
  search [text]     submit the search box (optionally replacing its text)
  filter <name>     tick a category      unfilter <name>   untick it
  page <n>          go to page n         next / prev       step one page
  size <n>          items per page       refresh           reload this page
  map               toggle the map       close             close the map
  open <id>         show an item         back              leave the item
  help              this text            quit              exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let keyword = word.to_ascii_lowercase();
    let one = |msg: Msg| Command::Dispatch(vec![msg]);
    match keyword.as_str() {
        "" => Command::Dispatch(Vec::new()),
        "type" => one(Msg::SearchInputChanged(rest.to_string())),
        "search" | "s" if rest.is_empty() => one(Msg::SearchSubmitted),
        "search" | "s" => Command::Dispatch(vec![
            Msg::SearchInputChanged(rest.to_string()),
            Msg::SearchSubmitted,
        ]),
        "filter" | "unfilter" if rest.is_empty() => Command::Unknown(line.to_string()),
        "filter" => one(Msg::CategoryToggled {
            name: rest.to_string(),
            checked: true,
        }),
        "unfilter" => one(Msg::CategoryToggled {
            name: rest.to_string(),
            checked: false,
        }),
        "page" | "size" | "open" => match (keyword.as_str(), rest.parse::<i64>()) {
            ("page", Ok(n)) => u32::try_from(n)
                .map(|n| one(Msg::PageSelected(n)))
                .unwrap_or_else(|_| Command::Unknown(line.to_string())),
            ("size", Ok(n)) => u32::try_from(n)
                .map(|n| one(Msg::PageSizeSelected(n)))
                .unwrap_or_else(|_| Command::Unknown(line.to_string())),
            ("open", Ok(id)) => one(Msg::DetailRequested(id)),
            _ => Command::Unknown(line.to_string()),
        },
        "next" | "n" => one(Msg::NextPage),
        "prev" | "p" => one(Msg::PrevPage),
        "refresh" | "r" => one(Msg::RefreshRequested),
        "map" | "m" => one(Msg::MapToggled),
        "close" => one(Msg::MapClosed),
        "back" | "b" => one(Msg::DetailClosed),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

//! Interactive, line-driven list view

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use stockdesk_core::{
    ListController, LiveList, Resource, FIELD_END_DATE, FIELD_ITEM_NAME, FIELD_START_DATE,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  name <text>    filter by item name (empty clears)
  from <date>    transactions on or after YYYY-MM-DD
  to <date>      transactions on or before YYYY-MM-DD
  sort <field>   sort by field; repeat to flip the direction
  refresh        fetch again with the current filters
  help           show this message
  quit           leave watch mode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Filter { field: &'static str, value: String },
    Sort(String),
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<WatchCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let filter = |field| WatchCommand::Filter {
        field,
        value: rest.to_string(),
    };
    match word {
        "name" => Ok(filter(FIELD_ITEM_NAME)),
        "from" => Ok(filter(FIELD_START_DATE)),
        "to" => Ok(filter(FIELD_END_DATE)),
        "sort" if rest.is_empty() => Err("sort needs a field name".to_string()),
        "sort" => Ok(WatchCommand::Sort(rest.to_string())),
        "refresh" | "r" => Ok(WatchCommand::Refresh),
        "help" | "?" | "" => Ok(WatchCommand::Help),
        "quit" | "exit" | "q" => Ok(WatchCommand::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Run until `quit` or end of input, redrawing after every applied fetch
pub async fn run<R, F>(
    controller: Arc<ListController<R>>,
    quiescence: Duration,
    render: F,
) -> Result<()>
where
    R: Resource,
    F: Fn(&[R::Record]) -> String,
{
    let mut applied = controller.subscribe();
    let mut live = LiveList::new(Arc::clone(&controller), quiescence);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    // failures are already reported to the user
    let _ = live.mount().await;
    applied.borrow_and_update();
    print!("{}", render(&controller.records()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(WatchCommand::Filter { field, value }) => live.input(field, &value),
                    Ok(WatchCommand::Sort(field)) if !R::is_sortable(&field) => {
                        eprintln!(
                            "cannot sort by '{}'; expected one of: {}",
                            field,
                            R::SORT_FIELDS.join(", ")
                        );
                    }
                    Ok(WatchCommand::Sort(field)) => {
                        let _ = live.sort_by(&field).await;
                    }
                    Ok(WatchCommand::Refresh) => {
                        let _ = controller.refresh().await;
                    }
                    Ok(WatchCommand::Help) => println!("{}", HELP),
                    Ok(WatchCommand::Quit) => break,
                    Err(message) => eprintln!("{} (type 'help')", message),
                }
            }
            changed = applied.changed() => {
                if changed.is_err() {
                    break;
                }
                applied.borrow_and_update();
                let sort = controller.sort();
                log::debug!("redrawing {} (query: {})", R::PATH, controller.query());
                if let Some(field) = sort.sort_by {
                    println!("sorted by {} {}", field, sort.order);
                }
                print!("{}", render(&controller.records()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            parse_command("name sabun cair"),
            Ok(WatchCommand::Filter {
                field: FIELD_ITEM_NAME,
                value: "sabun cair".to_string()
            })
        );
        assert_eq!(
            parse_command("  from 2024-01-01 "),
            Ok(WatchCommand::Filter {
                field: FIELD_START_DATE,
                value: "2024-01-01".to_string()
            })
        );
        assert_eq!(
            parse_command("name"),
            Ok(WatchCommand::Filter {
                field: FIELD_ITEM_NAME,
                value: String::new()
            })
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_command("sort stock"), Ok(WatchCommand::Sort("stock".to_string())));
        assert!(parse_command("sort").is_err());
        assert_eq!(parse_command("q"), Ok(WatchCommand::Quit));
        assert_eq!(parse_command(""), Ok(WatchCommand::Help));
        assert!(parse_command("delete 5").is_err());
    }
}

//! Shell command parsing.

use travellist_core::{Priority, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileField {
    Name(String),
    Email(String),
    Avatar(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { email: String, name: String },
    /// `remember` is `None` when the user did not say; the config default applies.
    Login { email: String, remember: Option<bool> },
    Logout,
    WhoAmI,
    Profile(ProfileField),
    Add {
        name: String,
        country: String,
        priority: Priority,
        status: Status,
    },
    List { status: Option<Status>, query: String },
    SetStatus { id: String, status: Status },
    Remove { id: String },
    Stats,
    Export { path: Option<String> },
    Import { path: String },
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  register <email> <name>             Create an account (prompts for password)
  login <email> [--remember|--forget] Log in (prompts for password)
  logout                              Log out everywhere on this device
  whoami                              Show the current user
  profile name|email|avatar <value>   Update your profile
  add <name> | <country> [--priority high|medium|low] [--status wishlist|planned|visited]
  list [all|wishlist|planned|visited] [search]
  status <id> <wishlist|planned|visited>
  remove <id>
  stats                               Progress, countries and achievements
  export [path]                       Write your data to a JSON file
  import <path>                       Replace your destinations from a JSON file
  help
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "register" => {
                let (email, name) = args
                    .split_first()
                    .ok_or("usage: register <email> <name>")?;
                if name.is_empty() {
                    return Err("usage: register <email> <name>".to_string());
                }
                Command::Register {
                    email: email.to_string(),
                    name: name.join(" "),
                }
            }
            "login" => {
                let mut email = None;
                let mut remember = None;
                for arg in args {
                    match arg {
                        "--remember" | "-r" => remember = Some(true),
                        "--forget" => remember = Some(false),
                        _ if email.is_none() => email = Some(arg.to_string()),
                        _ => return Err(format!("unexpected argument: {}", arg)),
                    }
                }
                Command::Login {
                    email: email.ok_or("usage: login <email> [--remember]")?,
                    remember,
                }
            }
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "profile" => {
                let (field, value) = args
                    .split_first()
                    .ok_or("usage: profile name|email|avatar <value>")?;
                let value = value.join(" ");
                if value.is_empty() {
                    return Err("usage: profile name|email|avatar <value>".to_string());
                }
                match *field {
                    "name" => Command::Profile(ProfileField::Name(value)),
                    "email" => Command::Profile(ProfileField::Email(value)),
                    "avatar" => Command::Profile(ProfileField::Avatar(value)),
                    other => return Err(format!("unknown profile field: {}", other)),
                }
            }
            "add" => parse_add(&args)?,
            "list" | "ls" => {
                let (status, rest) = match args.first() {
                    Some(&"all") => (None, &args[1..]),
                    Some(first) => match Status::from_str(first) {
                        Some(status) => (Some(status), &args[1..]),
                        None => (None, &args[..]),
                    },
                    None => (None, &args[..]),
                };
                Command::List {
                    status,
                    query: rest.join(" "),
                }
            }
            "status" => match args.as_slice() {
                [id, status] => Command::SetStatus {
                    id: id.to_string(),
                    status: Status::from_str(status)
                        .ok_or_else(|| format!("unknown status: {}", status))?,
                },
                _ => return Err("usage: status <id> <wishlist|planned|visited>".to_string()),
            },
            "remove" | "rm" => match args.as_slice() {
                [id] => Command::Remove { id: id.to_string() },
                _ => return Err("usage: remove <id>".to_string()),
            },
            "stats" => Command::Stats,
            "export" => Command::Export {
                path: args.first().map(|p| p.to_string()),
            },
            "import" => match args.as_slice() {
                [path] => Command::Import {
                    path: path.to_string(),
                },
                _ => return Err("usage: import <path>".to_string()),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {} (try 'help')", other)),
        };
        Ok(Some(command))
    }
}

fn parse_add(args: &[&str]) -> Result<Command, String> {
    let mut priority = Priority::default();
    let mut status = Status::default();
    let mut text = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--priority" => {
                let value = iter.next().ok_or("--priority needs a value")?;
                priority =
                    Priority::from_str(value).ok_or_else(|| format!("unknown priority: {}", value))?;
            }
            "--status" => {
                let value = iter.next().ok_or("--status needs a value")?;
                status = Status::from_str(value).ok_or_else(|| format!("unknown status: {}", value))?;
            }
            _ => text.push(*arg),
        }
    }

    let text = text.join(" ");
    let (name, country) = text
        .split_once('|')
        .ok_or("usage: add <name> | <country>")?;

    Ok(Command::Add {
        name: name.trim().to_string(),
        country: country.trim().to_string(),
        priority,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_register_joins_name() {
        assert_eq!(
            Command::parse("register a@x.com Alice Smith").unwrap(),
            Some(Command::Register {
                email: "a@x.com".to_string(),
                name: "Alice Smith".to_string()
            })
        );
        assert!(Command::parse("register a@x.com").is_err());
    }

    #[test]
    fn test_login_flags() {
        assert_eq!(
            Command::parse("login a@x.com --remember").unwrap(),
            Some(Command::Login {
                email: "a@x.com".to_string(),
                remember: Some(true)
            })
        );
        assert_eq!(
            Command::parse("login a@x.com").unwrap(),
            Some(Command::Login {
                email: "a@x.com".to_string(),
                remember: None
            })
        );
        assert!(Command::parse("login").is_err());
    }

    #[test]
    fn test_add() {
        assert_eq!(
            Command::parse("add Mount Fuji | Japan --status planned --priority high").unwrap(),
            Some(Command::Add {
                name: "Mount Fuji".to_string(),
                country: "Japan".to_string(),
                priority: Priority::High,
                status: Status::Planned,
            })
        );
        assert!(Command::parse("add Kyoto").is_err());
        assert!(Command::parse("add Kyoto | Japan --status gone").is_err());
    }

    #[test]
    fn test_list() {
        assert_eq!(
            Command::parse("list visited japan").unwrap(),
            Some(Command::List {
                status: Some(Status::Visited),
                query: "japan".to_string()
            })
        );
        assert_eq!(
            Command::parse("list all").unwrap(),
            Some(Command::List {
                status: None,
                query: String::new()
            })
        );
        assert_eq!(
            Command::parse("ls new zealand").unwrap(),
            Some(Command::List {
                status: None,
                query: "new zealand".to_string()
            })
        );
    }

    #[test]
    fn test_profile() {
        assert_eq!(
            Command::parse("profile name Alicia B").unwrap(),
            Some(Command::Profile(ProfileField::Name("Alicia B".to_string())))
        );
        assert!(Command::parse("profile age 3").is_err());
        assert!(Command::parse("profile name").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse("fly away").is_err());
    }
}

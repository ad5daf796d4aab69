use std::{error::Error, fmt::Display, path::PathBuf, process};

/// Parsed command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    DatadirPath(PathBuf),
}

/// Parse command-line arguments (including program name at args[0]).
pub fn parse_args(args: Vec<String>, version: impl Display) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    let app_name = std::path::Path::new(&args[0])
        .file_name()
        .and_then(|s| s.to_str())
        // This should never happen
        .unwrap_or("coffer-gui");

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", version);
        process::exit(0);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: {} [OPTIONS]

Options:
    --datadir <PATH>    Path of coffer datadir
    -v, --version       Display {} version
    -h, --help          Print help
        "#,
            app_name, app_name
        );
        process::exit(0);
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--datadir" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::DatadirPath(PathBuf::from(a)));
            } else {
                return Err("missing arg to --datadir".into());
            }
        } else if arg.starts_with("--") {
            return Err(format!("unknown option {}", arg).into());
        }
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION: &str = "0.1.0";

    #[test]
    fn test_parse_args() {
        assert!(parse_args(vec!["app".into(), "--meth".into()], VERSION).is_err());
        assert!(parse_args(vec!["app".into(), "--datadir".into()], VERSION).is_err());
        assert_eq!(
            Some(vec![Arg::DatadirPath(PathBuf::from("hello"))]),
            parse_args(
                "app --datadir hello"
                    .split(' ')
                    .map(|a| a.to_string())
                    .collect(),
                VERSION,
            )
            .ok()
        );
        assert_eq!(
            Some(Vec::new()),
            parse_args(vec!["app".into()], VERSION).ok()
        );
    }
}

// File: ./src/cli.rs
//! Command-line argument handling and `--help` output.
use crate::controller::Session;
use crate::help::{get_command_help, render_help};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const LINE: &str = "____________________________________________________________";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
    /// Single command to run instead of starting the interactive loop.
    pub command: Option<String>,
}

impl CliArgs {
    /// Parses arguments, excluding the binary name.
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "-v" | "--verbose" => parsed.verbose = true,
                "-r" | "--root" => {
                    let value = args.next().ok_or("--root needs a directory")?;
                    parsed.root = Some(PathBuf::from(value));
                }
                "-d" | "--data" => {
                    let value = args.next().ok_or("--data needs a file path")?;
                    parsed.data_file = Some(PathBuf::from(value));
                }
                "-c" | "--command" => {
                    let value = args.next().ok_or("--command needs a command")?;
                    parsed.command = Some(value);
                }
                other => return Err(format!("Unknown argument '{}'", other)),
            }
        }
        Ok(parsed)
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Cherry v{} - a small task tracker driven by short commands",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <dir>] [--data <file>] [--verbose]", binary_name);
    println!("    {} -c \"<command>\"", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <dir>      Use a different directory for config and data.");
    println!("    -d, --data <file>     Use a different save file.");
    println!("    -c, --command <cmd>   Run a single command and exit.");
    println!("    -v, --verbose         Write debug output to the log file.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("{}", render_help(&get_command_help()));
}

/// Interactive loop: one framed response per input line until `bye` or EOF.
///
/// Input is decoded lossily, so stray bytes reach the parser as an ordinary
/// bad command instead of ending the session.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    print_framed(&mut out, &session.welcome())?;

    let mut buf = Vec::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            // EOF behaves like `bye`, minus the message.
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        print_framed(&mut out, &session.handle(&line))?;
        if session.is_exit_requested() {
            break;
        }
    }
    Ok(())
}

fn print_framed<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "{}", LINE)?;
    writeln!(out, "{}", text)?;
    writeln!(out, "{}", LINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = CliArgs::parse(args(&[
            "--root", "/tmp/c", "-d", "tasks.txt", "-v", "-c", "list",
        ]))
        .unwrap();
        assert_eq!(parsed.root, Some(PathBuf::from("/tmp/c")));
        assert_eq!(parsed.data_file, Some(PathBuf::from("tasks.txt")));
        assert!(parsed.verbose);
        assert!(!parsed.help);
        assert_eq!(parsed.command.as_deref(), Some("list"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(args(&["--root"])).is_err());
        assert!(CliArgs::parse(args(&["--nope"])).is_err());
        assert_eq!(CliArgs::parse(args(&[])).unwrap(), CliArgs::default());
    }
}

//! CLI argument parsing.
//!
//! Hand-rolled parser over any iterator of strings so that every code path
//! can be exercised from unit tests without touching `std::env`.

use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// `-v` / `--verbose` anywhere on the command line.
    pub verbose: bool,
}

/// How a report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate a scenario file.
    Run {
        /// Path to the scenario YAML file.
        scenario_path: PathBuf,
        /// Output format.
        format: OutputFormat,
    },
    /// Check a scenario file without evaluating it.
    Validate {
        /// Path to the scenario YAML file.
        scenario_path: PathBuf,
    },
    /// Evaluate an M/M/c system.
    ErlangC {
        /// Arrival rate.
        lambda: f64,
        /// Service rate per server.
        mu: f64,
        /// Number of servers.
        servers: u32,
        /// Service-level thresholds.
        thresholds: Vec<f64>,
        /// Output format.
        format: OutputFormat,
    },
    /// Evaluate an M/M/c/c system.
    ErlangB {
        /// Offered load in Erlangs.
        traffic: f64,
        /// Number of servers.
        servers: u32,
        /// Output format.
        format: OutputFormat,
    },
    /// Evaluate an M/M/c/K+M system.
    Extended {
        /// Arrival rate.
        lambda: f64,
        /// Service rate per server.
        mu: f64,
        /// Abandonment rate per waiting customer.
        nu: f64,
        /// Number of servers.
        servers: u32,
        /// System capacity; `None` means unlimited.
        capacity: Option<u32>,
        /// Probability that a served customer re-enters the queue.
        forwarding: f64,
        /// Service-level thresholds.
        thresholds: Vec<f64>,
        /// Output format.
        format: OutputFormat,
    },
    /// Show help
    Help,
    /// Show version
    Version,
    /// Unusable command line; carries the reason.
    Invalid(String),
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let Some(name) = args.get(1) else {
            return Self {
                command: Command::Help,
                verbose: false,
            };
        };

        let rest = &args[2..];
        let command = match name.as_str() {
            "run" => Self::parse_run_command(rest),
            "validate" => Self::parse_validate_command(rest),
            "erlang-c" => Self::parse_erlang_c_command(rest),
            "erlang-b" => Self::parse_erlang_b_command(rest),
            "extended" => Self::parse_extended_command(rest),
            "-h" | "--help" | "help" => Ok(Command::Help),
            "-V" | "--version" | "version" => Ok(Command::Version),
            unknown => Err(format!("unknown command: {unknown}")),
        };

        Self {
            command: command.unwrap_or_else(Command::Invalid),
            verbose: rest.iter().any(|a| a == "-v" || a == "--verbose"),
        }
    }

    fn parse_run_command(rest: &[String]) -> Result<Command, String> {
        let flags = Flags::split(rest)?;
        flags.allow("run", &[])?;
        Ok(Command::Run {
            scenario_path: flags.path("run")?,
            format: flags.format()?,
        })
    }

    fn parse_validate_command(rest: &[String]) -> Result<Command, String> {
        let flags = Flags::split(rest)?;
        flags.allow("validate", &[])?;
        Ok(Command::Validate {
            scenario_path: flags.path("validate")?,
        })
    }

    fn parse_erlang_c_command(rest: &[String]) -> Result<Command, String> {
        let flags = Flags::split(rest)?;
        flags.no_positionals("erlang-c")?;
        flags.allow("erlang-c", &["--lambda", "--mu", "--servers", "--t"])?;
        Ok(Command::ErlangC {
            lambda: flags.required("--lambda")?,
            mu: flags.required("--mu")?,
            servers: flags.required("--servers")?,
            thresholds: flags.all("--t")?,
            format: flags.format()?,
        })
    }

    fn parse_erlang_b_command(rest: &[String]) -> Result<Command, String> {
        let flags = Flags::split(rest)?;
        flags.no_positionals("erlang-b")?;
        flags.allow("erlang-b", &["--traffic", "--servers"])?;
        Ok(Command::ErlangB {
            traffic: flags.required("--traffic")?,
            servers: flags.required("--servers")?,
            format: flags.format()?,
        })
    }

    fn parse_extended_command(rest: &[String]) -> Result<Command, String> {
        let flags = Flags::split(rest)?;
        flags.no_positionals("extended")?;
        flags.allow(
            "extended",
            &[
                "--lambda",
                "--mu",
                "--nu",
                "--servers",
                "--capacity",
                "--forward",
                "--t",
            ],
        )?;
        Ok(Command::Extended {
            lambda: flags.required("--lambda")?,
            mu: flags.required("--mu")?,
            nu: flags.optional("--nu")?.unwrap_or(0.0),
            servers: flags.required("--servers")?,
            capacity: flags.optional("--capacity")?,
            forwarding: flags.optional("--forward")?.unwrap_or(0.0),
            thresholds: flags.all("--t")?,
            format: flags.format()?,
        })
    }
}

/// Flags that take no value.
const SWITCHES: &[&str] = &["--json", "--yaml", "-v", "--verbose"];

/// Command-line words after the command name, sorted by role.
#[derive(Debug, Default)]
struct Flags {
    positionals: Vec<String>,
    values: Vec<(String, String)>,
    switches: Vec<String>,
}

impl Flags {
    fn split(rest: &[String]) -> Result<Self, String> {
        let mut flags = Self::default();
        let mut words = rest.iter();
        while let Some(word) = words.next() {
            if SWITCHES.contains(&word.as_str()) {
                flags.switches.push(word.clone());
            } else if word.starts_with("--") {
                let value = words
                    .next()
                    .ok_or_else(|| format!("{word} requires a value"))?;
                flags.values.push((word.clone(), value.clone()));
            } else {
                flags.positionals.push(word.clone());
            }
        }
        Ok(flags)
    }

    fn path(&self, command: &str) -> Result<PathBuf, String> {
        match self.positionals.as_slice() {
            [path] => Ok(PathBuf::from(path)),
            [] => Err(format!("'{command}' requires a scenario path")),
            [_, extra, ..] => Err(format!("unexpected argument: {extra}")),
        }
    }

    fn no_positionals(&self, command: &str) -> Result<(), String> {
        match self.positionals.first() {
            Some(extra) => Err(format!("'{command}' takes no argument {extra}")),
            None => Ok(()),
        }
    }

    fn allow(&self, command: &str, known: &[&str]) -> Result<(), String> {
        match self.values.iter().find(|(flag, _)| !known.contains(&flag.as_str())) {
            Some((flag, _)) => Err(format!("'{command}' does not accept {flag}")),
            None => Ok(()),
        }
    }

    fn format(&self) -> Result<OutputFormat, String> {
        let json = self.switches.iter().any(|s| s == "--json");
        let yaml = self.switches.iter().any(|s| s == "--yaml");
        match (json, yaml) {
            (true, true) => Err("--json and --yaml are mutually exclusive".to_string()),
            (true, false) => Ok(OutputFormat::Json),
            (false, true) => Ok(OutputFormat::Yaml),
            (false, false) => Ok(OutputFormat::Text),
        }
    }

    fn all<T: FromStr>(&self, name: &str) -> Result<Vec<T>, String> {
        self.values
            .iter()
            .filter(|(flag, _)| flag == name)
            .map(|(_, value)| {
                value
                    .parse()
                    .map_err(|_| format!("invalid value for {name}: {value}"))
            })
            .collect()
    }

    fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, String> {
        let mut values = self.all(name)?;
        match values.len() {
            0 | 1 => Ok(values.pop()),
            _ => Err(format!("{name} given more than once")),
        }
    }

    fn required<T: FromStr>(&self, name: &str) -> Result<T, String> {
        self.optional(name)?
            .ok_or_else(|| format!("missing required option {name}"))
    }
}

//! sdkbridge -- status code lookup for the hardware SDK binding layer.
//!
//! ```text
//! sdkbridge [--config <path>] describe <code>...
//! sdkbridge [--config <path>] check <function> <code>
//! ```
//!
//! Codes are decimal (`-2147024809`, `5`) or hex (`0x80070057`). `check` exits
//! with status 1 when the code is a failure HRESULT.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use sdkbridge::config::Config;
use sdkbridge::{logging, native};

const USAGE: &str = "usage: sdkbridge [--config <path>] describe <code>...\n       \
                     sdkbridge [--config <path>] check <function> <code>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Describe(Vec<i32>),
    Check { function: String, code: i32 },
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    command: Command,
}

/// Parses a status code. Hex values above `i32::MAX` wrap to their HRESULT
/// bit pattern.
fn parse_code(raw: &str) -> Result<i32, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32),
        None => raw.parse::<i32>(),
    };
    parsed.map_err(|e| format!("invalid status code {raw:?}: {e}"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config = None;
    let mut rest = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .filter(|path| !path.starts_with('-'))
                .ok_or("--config needs a path")?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("describe") => {
            let codes = rest.map(|c| parse_code(&c)).collect::<Result<Vec<_>, _>>()?;
            if codes.is_empty() {
                return Err("describe needs at least one code".into());
            }
            Command::Describe(codes)
        }
        Some("check") => {
            let (Some(function), Some(code), None) = (rest.next(), rest.next(), rest.next())
            else {
                return Err("check needs <function> <code>".into());
            };
            Command::Check {
                function,
                code: parse_code(&code)?,
            }
        }
        Some(other) => return Err(format!("unknown command {other:?}")),
        None => return Err("missing command".into()),
    };

    Ok(Args { config, command })
}

fn run(command: Command) -> ExitCode {
    match command {
        Command::Describe(codes) => {
            for code in codes {
                println!("{:#010x}  {}", code, native::describe(code));
            }
            ExitCode::SUCCESS
        }
        Command::Check { function, code } => match native::check_hresult(&function, code) {
            Ok(()) => {
                println!("{function}: ok ({code:#010x})");
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("sdkbridge: {e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match Config::discover(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sdkbridge: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("sdkbridge: logger setup failed: {e}");
    }
    log::debug!("sdkbridge v{}", env!("CARGO_PKG_VERSION"));

    run(args.command)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn hex_codes_wrap_to_hresult() {
        assert_eq!(parse_code("0x80070057"), Ok(native::hresult::E_INVALIDARG));
        assert_eq!(parse_code("0X5"), Ok(5));
        assert_eq!(parse_code("-2147024809"), Ok(native::hresult::E_INVALIDARG));
        assert!(parse_code("0x1_0000_0000").is_err());
        assert!(parse_code("five").is_err());
    }

    #[test]
    fn describe_takes_many_codes() {
        let parsed = args(&["describe", "5", "0x80004005"]).unwrap();
        assert_eq!(parsed.config, None);
        assert_eq!(
            parsed.command,
            Command::Describe(vec![5, native::hresult::E_FAIL])
        );
    }

    #[test]
    fn config_flag_anywhere() {
        let parsed = args(&["check", "--config", "dev.toml", "SdkOpen", "0"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("dev.toml")));
        assert_eq!(
            parsed.command,
            Command::Check {
                function: "SdkOpen".into(),
                code: 0
            }
        );
    }

    #[test]
    fn malformed_invocations_are_rejected() {
        assert!(args(&[]).is_err());
        assert!(args(&["describe"]).is_err());
        assert!(args(&["check", "SdkOpen"]).is_err());
        assert!(args(&["check", "SdkOpen", "0", "extra"]).is_err());
        assert!(args(&["explode"]).is_err());
        assert!(args(&["describe", "--config"]).is_err());
        assert!(args(&["--config", "--verbose", "describe", "5"]).is_err());
        assert!(args(&["--config", "-", "describe", "5"]).is_err());
    }
}

use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("OBSCURA_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::{ARG_VERBOSITY, validator_log_level};
    use clap::{Arg, Command};

    fn test_command() -> Command {
        Command::new("test").arg(
            Arg::new(ARG_VERBOSITY)
                .long("level")
                .value_parser(validator_log_level()),
        )
    }

    #[test]
    fn named_levels_map_to_counts() {
        for (name, expected) in [
            ("error", 0u8),
            ("warn", 1),
            ("info", 2),
            ("DEBUG", 3),
            ("trace", 4),
        ] {
            let matches = test_command()
                .try_get_matches_from(["test", "--level", name])
                .unwrap_or_else(|err| panic!("level {name} should parse: {err}"));
            assert_eq!(
                matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                Some(expected),
                "level {name}"
            );
        }
    }

    #[test]
    fn invalid_level_rejected() {
        assert!(
            test_command()
                .try_get_matches_from(["test", "--level", "verbose"])
                .is_err()
        );
        assert!(
            test_command()
                .try_get_matches_from(["test", "--level", "99"])
                .is_err()
        );
    }
}

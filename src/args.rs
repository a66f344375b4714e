use std::ffi::{OsStr, OsString};

/// Flags that take the following token as their value.
const VALUED_FLAGS: [&str; 4] =
    ["--output-dir", "--logo", "--assets-dir", "--weasyprint"];

/// Flags handed to clap untouched.
const PASSTHROUGH_FLAGS: [&str; 2] = ["--help", "--version"];

/// Rewrites raw command line tokens into a form clap parses unambiguously.
///
/// Known valued flags consume the next token whatever it looks like, a
/// known flag at the end of the line or with an empty value is dropped,
/// unrecognised `--` tokens are skipped and every other token names the
/// config file, the last one winning. An empty name leaves no config file.
/// The first token is the program name and is kept as is.
pub fn normalize<I>(tokens: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut tokens = tokens.into_iter();
    let program = tokens.next();

    let mut flags: Vec<(&'static str, OsString)> = Vec::new();
    let mut passthrough: Vec<&'static str> = Vec::new();
    let mut config: Option<OsString> = None;

    let rest: Vec<OsString> = tokens.collect();
    let mut i = 0;
    while i < rest.len() {
        let token = rest[i].as_os_str();
        if let Some(flag) = valued_flag(token) {
            if let Some(value) = rest.get(i + 1) {
                // An empty value falls back to the default.
                flags.retain(|(name, _)| *name != flag);
                if !value.is_empty() {
                    flags.push((flag, value.clone()));
                }
                i += 2;
            } else {
                i += 1;
            }
        } else if is_long_flag(token) {
            if let Some(flag) = passthrough_flag(token) {
                if !passthrough.contains(&flag) {
                    passthrough.push(flag);
                }
            }
            i += 1;
        } else {
            config = Some(rest[i].clone()).filter(|path| !path.is_empty());
            i += 1;
        }
    }

    let mut normalized = Vec::with_capacity(flags.len() + 4);
    normalized.extend(program);
    normalized.extend(passthrough.into_iter().map(OsString::from));
    for (flag, value) in flags {
        let mut joined = OsString::from(flag);
        joined.push("=");
        joined.push(value);
        normalized.push(joined);
    }
    if let Some(config) = config {
        normalized.push(OsString::from("--"));
        normalized.push(config);
    }
    normalized
}

fn valued_flag(token: &OsStr) -> Option<&'static str> {
    VALUED_FLAGS.into_iter().find(|flag| token == *flag)
}

fn passthrough_flag(token: &OsStr) -> Option<&'static str> {
    PASSTHROUGH_FLAGS.into_iter().find(|flag| token == *flag)
}

fn is_long_flag(token: &OsStr) -> bool {
    token.as_encoded_bytes().starts_with(b"--")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Opts;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(tokens: &[&str]) -> Opts {
        let raw = std::iter::once("generate-invoice")
            .chain(tokens.iter().copied())
            .map(OsString::from);
        Opts::parse_from(normalize(raw))
    }

    #[test]
    fn positional_and_flags() {
        let opts = parse(&["acme.yaml", "--output-dir", "out", "--logo", "l.png"]);
        assert_eq!(opts.config, Some(PathBuf::from("acme.yaml")));
        assert_eq!(opts.output_dir, Some(PathBuf::from("out")));
        assert_eq!(opts.logo, Some(PathBuf::from("l.png")));
    }

    #[test]
    fn last_config_wins() {
        let opts = parse(&["first.yaml", "second.yaml"]);
        assert_eq!(opts.config, Some(PathBuf::from("second.yaml")));
    }

    #[test]
    fn unknown_flags_are_skipped() {
        let opts = parse(&["--verbose", "acme.yaml", "--dry-run"]);
        assert_eq!(opts.config, Some(PathBuf::from("acme.yaml")));
        assert_eq!(opts.output_dir, None);
    }

    #[test]
    fn flag_value_may_look_like_a_flag() {
        let opts = parse(&["--output-dir", "--weird", "acme.yaml"]);
        assert_eq!(opts.output_dir, Some(PathBuf::from("--weird")));
        assert_eq!(opts.config, Some(PathBuf::from("acme.yaml")));
    }

    #[test]
    fn trailing_flag_without_value_is_ignored() {
        let opts = parse(&["acme.yaml", "--logo"]);
        assert_eq!(opts.logo, None);
        assert_eq!(opts.config, Some(PathBuf::from("acme.yaml")));
    }

    #[test]
    fn single_dash_token_is_a_path() {
        let opts = parse(&["-invoice.yaml"]);
        assert_eq!(opts.config, Some(PathBuf::from("-invoice.yaml")));
    }

    #[test]
    fn repeated_flag_keeps_last_value() {
        let opts = parse(&["--logo", "a.png", "--logo", "b.png", "x.yaml"]);
        assert_eq!(opts.logo, Some(PathBuf::from("b.png")));
    }

    #[test]
    fn empty_flag_value_uses_default() {
        let opts = parse(&["acme.yaml", "--output-dir", "", "--logo", ""]);
        assert_eq!(opts.output_dir, None);
        assert_eq!(opts.logo, None);
        assert_eq!(opts.config, Some(PathBuf::from("acme.yaml")));
    }

    #[test]
    fn empty_flag_value_clears_earlier_one() {
        let opts = parse(&["--logo", "a.png", "--logo", "", "x.yaml"]);
        assert_eq!(opts.logo, None);
    }

    #[test]
    fn empty_config_name_means_no_config() {
        let opts = parse(&["acme.yaml", ""]);
        assert_eq!(opts.config, None);
    }

    #[test]
    fn no_config() {
        let opts = parse(&["--output-dir", "out"]);
        assert_eq!(opts.config, None);
    }
}

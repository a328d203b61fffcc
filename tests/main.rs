use argbind::shell::complete_line;
use argbind::{
    register_converter_factory, Collection, CommandLineParser, ConfigError, Parameter,
    ParameterGroup, ParseError, Scalar, Switch, TypeConverterFactory,
};
use rstest::rstest;
use std::io::Write;

#[rstest]
#[case(vec!["foo", "bar"], "hey")]
#[case(vec!["foo", "bar", "baz"], "baz")]
fn positional_arguments(#[case] tokens: Vec<&str>, #[case] expected: &str) {
    // Setup
    let mut from: String = String::default();
    let mut to: String = String::default();
    let mut optional: String = "hey".to_string();
    let parser = CommandLineParser::new("program")
        .add(Parameter::argument(Scalar::new(&mut from), 0, "from"))
        .add(Parameter::argument(Scalar::new(&mut to), 1, "to"))
        .add(Parameter::argument(Scalar::new(&mut optional), 2, "optional").optional())
        .build_parser()
        .unwrap();

    // Execute
    parser.parse_tokens(tokens.as_slice()).unwrap();

    // Verify
    assert_eq!(&from, "foo");
    assert_eq!(&to, "bar");
    assert_eq!(&optional, expected);
}

#[rstest]
#[case(vec![])]
#[case(vec!["foo"])]
fn positional_arguments_missing(#[case] tokens: Vec<&str>) {
    // Setup
    let mut from: String = String::default();
    let mut to: String = String::default();
    let mut optional: String = "hey".to_string();
    let parser = CommandLineParser::new("program")
        .add(Parameter::argument(Scalar::new(&mut from), 0, "from"))
        .add(Parameter::argument(Scalar::new(&mut to), 1, "to"))
        .add(Parameter::argument(Scalar::new(&mut optional), 2, "optional").optional())
        .build_parser()
        .unwrap();

    // Execute
    let result = parser.parse_tokens(tokens.as_slice());

    // Verify
    assert!(matches!(result, Err(ParseError::MissingPositionalArgument(_))));
}

#[test]
fn flag_never_consumes() {
    // Setup
    let mut debug: bool = false;
    let mut first: String = String::default();
    let parser = CommandLineParser::new("program")
        .add(Parameter::option(Switch::new(&mut debug, true), ["--debug"]))
        .add(Parameter::argument(Scalar::new(&mut first), 0, "first"))
        .build_parser()
        .unwrap();

    // Execute
    let parsed = parser.parse_tokens(&["--debug", "extra"]).unwrap();

    // Verify
    assert!(debug);
    assert_eq!(&first, "extra");
    assert!(parsed.was_assigned("--debug"));
}

#[test]
fn required_options_assigned() {
    // Setup
    let mut name: String = String::default();
    let mut level: u8 = 0;
    let parser = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut name), ["-n", "--name"]).required())
        .add(Parameter::option(Scalar::new(&mut level), ["--level"]).required())
        .build_parser()
        .unwrap();

    // Execute
    let parsed = parser
        .parse_tokens(&["--level", "4", "--name", "x"])
        .unwrap();

    // Verify
    assert!(parsed.was_assigned("-n"));
    assert!(parsed.was_assigned("--level"));
    assert_eq!(&name, "x");
    assert_eq!(level, 4);
}

#[test]
fn required_options_missing() {
    // Setup
    let mut name: String = String::default();
    let mut level: u8 = 0;
    let parser = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut name), ["-n", "--name"]).required())
        .add(Parameter::option(Scalar::new(&mut level), ["--level"]).required())
        .build_parser()
        .unwrap();

    // Execute
    let result = parser.parse_tokens(&[]);

    // Verify
    match result {
        Err(ParseError::MissingRequiredOptions(names)) => {
            assert_eq!(names, vec!["-n", "--level"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn duplicate_single_valued() {
    // Setup
    let mut author: String = String::default();
    let parser = CommandLineParser::new("program")
        .group(
            ParameterGroup::new()
                .separators("=")
                .add(Parameter::option(Scalar::new(&mut author), ["--author"])),
        )
        .build_parser()
        .unwrap();

    // Execute
    let result = parser.parse_tokens(&["--author=a", "--author=b"]);

    // Verify
    assert!(matches!(result, Err(ParseError::DuplicateOption(name)) if name == "--author"));
}

#[test]
fn repeated_collection() {
    // Setup
    let mut authors: Vec<String> = vec!["initial".to_string()];
    let parser = CommandLineParser::new("program")
        .group(
            ParameterGroup::new()
                .separators("=")
                .add(Parameter::option(Collection::new(&mut authors), ["--author"])),
        )
        .build_parser()
        .unwrap();

    // Execute
    parser
        .parse_tokens(&["--author=a", "--author", "b"])
        .unwrap();

    // Verify
    assert_eq!(authors, vec!["initial", "a", "b"]);
}

#[test]
fn file_expansion() {
    // Setup
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "--name").unwrap();
    writeln!(file, "from file").unwrap();
    let token = format!("@{}", file.path().display());
    let mut expanded_name: String = String::default();
    let mut literal_name: String = String::default();
    let expanded = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut expanded_name), ["--name"]))
        .build_parser()
        .unwrap();
    let literal = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut literal_name), ["--name"]))
        .build_parser()
        .unwrap();

    // Execute
    expanded.parse_tokens(&[token.as_str()]).unwrap();
    literal.parse_tokens(&["--name", "from file"]).unwrap();

    // Verify
    assert_eq!(&expanded_name, "from file");
    assert_eq!(expanded_name, literal_name);
}

#[test]
fn sub_commands() {
    // Setup
    let mut debug: bool = false;
    let mut amend: bool = false;
    let mut author: String = String::default();
    let mut paths: Vec<String> = Vec::default();
    let parser = CommandLineParser::new("git")
        .add(Parameter::option(Switch::new(&mut debug, true), ["--debug"]))
        .command(
            "add",
            CommandLineParser::new("add")
                .add(Parameter::catch_all(Collection::new(&mut paths), "paths")),
        )
        .command(
            "commit",
            CommandLineParser::new("commit")
                .add(Parameter::option(Switch::new(&mut amend, true), ["--amend"]))
                .add(Parameter::option(Scalar::new(&mut author), ["--author"])),
        )
        .build_parser()
        .unwrap();

    // Execute
    let parsed = parser
        .parse_tokens(&["--debug", "commit", "--author", "cbeust", "--amend"])
        .unwrap();

    // Verify
    assert_eq!(parsed.command(), Some("commit"));
    assert!(debug);
    assert!(amend);
    assert_eq!(&author, "cbeust");
    assert!(paths.is_empty());
}

#[test]
fn unknown_command() {
    let parser = CommandLineParser::new("git")
        .command("add", CommandLineParser::new("add"))
        .build_parser()
        .unwrap();
    let result = parser.parse_tokens(&["push"]);
    assert!(matches!(result, Err(ParseError::UnknownCommand(name)) if name == "push"));
}

#[rstest]
#[case(vec![], 0, vec!["add", "commit"])]
#[case(vec!["c"], 0, vec!["ommit"])]
#[case(vec!["commit", "--a"], 1, vec!["mend", "uthor"])]
#[case(vec!["commit", "--author", "x", "--"], 3, vec!["amend", "author"])]
#[case(vec!["commit", "--author", ""], 2, vec![])]
fn completion(#[case] tokens: Vec<&str>, #[case] cursor: usize, #[case] expected: Vec<&str>) {
    // Setup
    let mut amend: bool = false;
    let mut author: String = String::default();
    let parser = CommandLineParser::new("git")
        .command("add", CommandLineParser::new("add"))
        .command(
            "commit",
            CommandLineParser::new("commit")
                .add(Parameter::option(Switch::new(&mut amend, true), ["--amend"]))
                .add(Parameter::option(Scalar::new(&mut author), ["--author"])),
        )
        .build_parser()
        .unwrap();

    // Execute
    let result = parser.complete(tokens.as_slice(), cursor);

    // Verify
    assert_eq!(result.results(), expected);
}

#[rstest]
#[case("", vec!["add", "commit"])]
#[case("co", vec!["mmit"])]
#[case("commit ", vec![])]
#[case("commit --am", vec!["end"])]
#[case("add  ./src ", vec![])]
fn line_completion(#[case] buffer: &str, #[case] expected: Vec<&str>) {
    // Setup
    let mut amend: bool = false;
    let mut paths: Vec<String> = Vec::default();
    let parser = CommandLineParser::new("git")
        .command(
            "add",
            CommandLineParser::new("add")
                .add(Parameter::catch_all(Collection::new(&mut paths), "paths")),
        )
        .command(
            "commit",
            CommandLineParser::new("commit")
                .add(Parameter::option(Switch::new(&mut amend, true), ["--amend"])),
        )
        .build_parser()
        .unwrap();

    // Execute
    let results = complete_line(&parser, buffer, buffer.len());

    // Verify
    assert_eq!(results, expected);
}

#[test]
fn argument_completer() {
    // Setup
    let mut remote: String = String::default();
    let parser = CommandLineParser::new("git")
        .command(
            "push",
            CommandLineParser::new("push").add(
                Parameter::argument(Scalar::new(&mut remote), 0, "remote").completer(
                    |result: &mut argbind::CompletionResult| {
                        result.add_candidates(["origin", "upstream"]);
                    },
                ),
            ),
        )
        .build_parser()
        .unwrap();

    // Execute & verify
    assert_eq!(complete_line(&parser, "push ", 5), vec!["origin", "upstream"]);
    assert_eq!(complete_line(&parser, "push o", 6), vec!["rigin"]);
}

#[derive(Debug, PartialEq)]
struct Version(u8, u8);

#[test]
fn registered_converter() {
    // Setup
    register_converter_factory(TypeConverterFactory::<Version>::new(
        |value: &str| -> Result<Version, String> {
            let (major, minor) = value
                .split_once('.')
                .ok_or_else(|| format!("'{value}' is not major.minor"))?;
            Ok(Version(
                major.parse().map_err(|_| "bad major".to_string())?,
                minor.parse().map_err(|_| "bad minor".to_string())?,
            ))
        },
    ));
    let mut version = Version(0, 0);
    let parser = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut version), ["--version"]))
        .build_parser()
        .unwrap();

    // Execute
    parser.parse_tokens(&["--version", "1.2"]).unwrap();

    // Verify
    assert_eq!(version, Version(1, 2));
}

#[test]
fn missing_converter() {
    struct Opaque;

    let mut opaque = Opaque;
    let result = CommandLineParser::new("program")
        .add(Parameter::option(Scalar::new(&mut opaque), ["--opaque"]))
        .build_parser();
    assert!(matches!(result, Err(ConfigError::MissingConverter { .. })));
}

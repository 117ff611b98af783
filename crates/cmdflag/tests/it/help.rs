use cmdflag::{CommandBuilder, Flag, NumKind, Value};
use expect_test::expect;

#[test]
fn full_help() {
    let cmd = CommandBuilder::new("tar")
        .usage("Manipulates tape archives.")
        .version("v1.0.0")
        .flag(Flag::new("-z, --gz", Value::bool()).usage("Use gzip."))
        .flag(
            Flag::new("-f", Value::string())
                .arglist("FILE")
                .usage("Archive file.")
                .env("TAR_FILE")
                .default("a.tar"),
        )
        .flag(Flag::new("--level", Value::number(NumKind::U8)).selects(["1", "9"]))
        .flag(Flag::positional("SOURCE", Value::string_seq()).usage("Files to add."))
        .subcommand(CommandBuilder::new("list").alias("ls").usage("Lists entries."))
        .build()
        .unwrap();

    expect![[r#"
        tar
          Manipulates tape archives.

        VERSION:
            v1.0.0

        ARGS:
            [SOURCE]...
              Files to add. (type: [string])

        OPTIONS:
            -z, --gz
              Use gzip. (type: bool)

            -f <FILE>
              Archive file. (type: string; env: TAR_FILE; default: a.tar)

            --level <VALUE>
              (type: u8; selects: [1, 9])

            -h, --help
              Prints help information. (type: bool)

        SUBCOMMANDS:
            list, ls
              Lists entries.
    "#]]
    .assert_eq(&cmd.help());

    expect![[r#"
        list
          Lists entries.
    "#]]
    .assert_eq(&cmd.subcommand("ls").unwrap().help());
}

#[test]
fn descriptions_and_sequences() {
    let cmd = CommandBuilder::new("grep")
        .desc(
            "
            Searches files.

              Patterns are regular expressions.
            ",
        )
        .flag(
            Flag::new("-e", Value::string_seq())
                .arglist("PATTERN")
                .env("GREP_PATTERNS")
                .sep(":")
                .defaults(["a", "b"])
                .desc(
                    "
                    Can be repeated.
                    ",
                ),
        )
        .flag(Flag::positional("FILE", Value::string()))
        .overflow(false)
        .help(false)
        .build()
        .unwrap();

    assert_eq!(cmd.desc(), "Searches files.\n\n  Patterns are regular expressions.");
    expect![[r#"
        grep
          Searches files.

            Patterns are regular expressions.

        ARGS:
            [FILE]
              (type: string)

            [ARGS]...

        OPTIONS:
            -e <PATTERN>...
              (type: [string]; env: GREP_PATTERNS, split by ':'; default: [a, b])
              Can be repeated.
    "#]]
    .assert_eq(&cmd.help());
}

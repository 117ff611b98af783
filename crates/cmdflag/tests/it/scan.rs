use cmdflag::{scan, Argument, Command, CommandBuilder, Flag, ScanResult, Value};
use expect_test::{expect, Expect};

fn tar() -> Command {
    CommandBuilder::new("tar")
        .flag(Flag::new("-z, --gz", Value::bool()))
        .flag(Flag::new("-c", Value::bool()))
        .flag(Flag::new("-f", Value::string()))
        .flag(Flag::new("-I", Value::string_seq()))
        .flag(Flag::new("-output", Value::string()))
        .flag(Flag::new("-files", Value::string_seq()))
        .flag(Flag::positional("SOURCE", Value::string_seq()))
        .subcommand(
            CommandBuilder::new("list")
                .flag(Flag::new("-l, --long", Value::bool()))
                .subcommand(CommandBuilder::new("deep").flag(Flag::new("-d", Value::bool()))),
        )
        .subcommand(CommandBuilder::new("extract").alias("x").flag(Flag::new("-k", Value::bool())))
        .build()
        .unwrap()
}

fn check(args: &str, expect: Expect) {
    let args = args.split_ascii_whitespace().collect::<Vec<_>>();
    let res = scan(&tar(), &args);
    expect.assert_eq(&render(&res));
}

fn render(res: &ScanResult) -> String {
    let args = res
        .args
        .iter()
        .map(|arg| match arg {
            Argument::Flag { name, attached: None } => format!("flag({name})"),
            Argument::Flag { name, attached: Some(value) } => format!("flag({name}={value})"),
            Argument::Value(value) => format!("value({value})"),
        })
        .collect::<Vec<_>>();
    let mut buf = format!("[{}]", args.join(" "));
    for (name, child) in &res.children {
        buf.push_str(&format!(" {name}: {{{}}}", render(child)));
    }
    buf
}

#[test]
fn cluster_structure() {
    let res = scan(&tar(), &["-zcf", "a.tgz"]);
    expect![[r#"
        ScanResult {
            args: [
                Flag {
                    name: "-z",
                    attached: None,
                },
                Flag {
                    name: "-c",
                    attached: None,
                },
                Flag {
                    name: "-f",
                    attached: None,
                },
                Value(
                    "a.tgz",
                ),
            ],
            children: [],
        }
    "#]]
    .assert_debug_eq(&res);
}

#[test]
fn cluster_matches_separate_flags() {
    let cmd = tar();
    assert_eq!(scan(&cmd, &["-zcf", "a.tgz"]), scan(&cmd, &["-z", "-c", "-f", "a.tgz"]));
    check("-zc=false", expect![["[flag(-z) flag(-c=false)]"]]);
}

#[test]
fn exact_name_wins() {
    check("-output a.out -files a b", expect![["[flag(-output) value(a.out) flag(-files) value(a) value(b)]"]]);
    check("-z", expect![["[flag(-z)]"]]);
    check("--gz", expect![["[flag(--gz)]"]]);
}

#[test]
fn glued_value() {
    check("-I/usr/include -I /opt", expect![["[flag(-I) value(/usr/include) flag(-I) value(/opt)]"]]);
    // Not a cluster because `q` is unknown, so `-z` takes `q` as a glued value.
    check("-zq", expect![["[flag(-z) value(q)]"]]);
}

#[test]
fn attached_value() {
    check("--gz=yes -f=a.tgz", expect![["[flag(--gz=yes) flag(-f=a.tgz)]"]]);
    check("--out= -f=", expect![["[flag(--out=) flag(-f) value(=)]"]]);
    check("=x", expect![["[value(=x)]"]]);
}

#[test]
fn unknown_flags_are_kept() {
    check("-q --quiet", expect![["[flag(-q) flag(--quiet)]"]]);
}

#[test]
fn dash_forces_next_value() {
    check("- -output a.out", expect![["[value(-output) value(a.out)]"]]);
    check("- - -z", expect![["[value(-) flag(-z)]"]]);
    check("-f -", expect![["[flag(-f) value(-)]"]]);
}

#[test]
fn double_dash_forces_rest() {
    check("-files -- -a=b -- -b.md", expect![["[flag(-files) value(-a=b) value(--) value(-b.md)]"]]);
    check("-files --", expect![["[flag(-files) value(--)]"]]);
    check("-- -z list", expect![["[value(-z) value(list)]"]]);
}

#[test]
fn subcommand_runs() {
    check(
        "-z list -l deep -d -c a",
        expect![["[flag(-z) flag(-c) value(a)] list: {[flag(-l)] deep: {[flag(-d)]}}"]],
    );
    check("- list", expect![["[value(list)]"]]);
}

#[test]
fn marker_inside_run_belongs_to_child() {
    check("list -- -c", expect![["[] list: {[value(-c)]}"]]);
}

#[test]
fn child_runs_once() {
    check("list -c list", expect![["[flag(-c) value(list)] list: {[]}"]]);
}

#[test]
fn alias_keyed_by_name() {
    check("x -k", expect![["[] extract: {[flag(-k)]}"]]);
}

#[test]
fn several_children() {
    let args = ["list", "-l", "-z", "extract", "-k"];
    let res = scan(&tar(), &args);
    expect![["[flag(-z)] list: {[flag(-l)]} extract: {[flag(-k)]}"]].assert_eq(&render(&res));
    assert_eq!(res.first(), Some("list"));
    assert!(res.child("extract").is_some());
}

#[test]
fn runs_end_at_exact_parent_names() {
    let app = CommandBuilder::new("app")
        .flag(Flag::new("-v", Value::bool()))
        .flag(Flag::new("-a", Value::bool()))
        .flag(Flag::new("-b", Value::bool()))
        .flag(Flag::new("-f", Value::string()))
        .subcommand(
            CommandBuilder::new("list")
                .flag(Flag::new("-verbose", Value::bool()))
                .flag(Flag::new("-ab", Value::bool()))
                .flag(Flag::new("-l", Value::bool())),
        )
        .build()
        .unwrap();
    let check = |args: &str, expect: Expect| {
        let args = args.split_ascii_whitespace().collect::<Vec<_>>();
        expect.assert_eq(&render(&scan(&app, &args)));
    };

    check("list -verbose", expect![["[] list: {[flag(-verbose)]}"]]);
    check("list -ab -vb", expect![["[] list: {[flag(-ab) flag(-vb)]}"]]);
    check("list -l -f=x", expect![["[flag(-f=x)] list: {[flag(-l)]}"]]);
    check("list -l -v -ab", expect![["[flag(-v) flag(-a) flag(-b)] list: {[flag(-l)]}"]]);
}

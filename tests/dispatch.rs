use cascade::{
    App, CascadeError, ColorMode, Command, Context, Grammar, Inheritance, ManualRun, Output,
    Result, Routes, Settings,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn describe(ctx: &Context<'_>) -> String {
    format!(
        "{} pos={:?} flags={:?} opts={:?} depth={}",
        ctx.identifier(),
        ctx.positionals(),
        ctx.args().flags(),
        ctx.args().options(),
        ctx.call_structure().len()
    )
}

/// Root command used by most tests.
struct Root {
    log: Log,
    requires_args: bool,
}

impl Root {
    fn run_deploy(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("method deploy {}", describe(ctx)));
        Ok(())
    }

    fn run_trigger(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push("method trigger".to_string());
        ctx.manual_run("restart --force")?;
        self.log.borrow_mut().push("trigger done".to_string());
        Ok(())
    }

    fn run_isolated(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.manual_run(
            ManualRun::line("restart")
                .merge_positionals(false)
                .flags(Inheritance::Override(BTreeSet::new())),
        )
    }

    fn run_restart(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("method restart {}", describe(ctx)));
        Ok(())
    }

    fn run_fail(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.bail("something broke")
    }

    fn run_need(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_num_positionals(2)?;
        self.log.borrow_mut().push("need satisfied".to_string());
        Ok(())
    }

    fn run_orphan(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.parent().map(|_| ())
    }

    fn run_checked(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_has_positional("target")?;
        ctx.assert_has_flag("yes")?;
        ctx.assert_has_option("env")?;
        self.log.borrow_mut().push("checked".to_string());
        Ok(())
    }

    fn run_reroute(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let replaced = ctx.parse("leftover --tag='v2'");
        ctx.set_args(replaced);
        ctx.manual_run("release")
    }

    fn argument_sub1(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log
            .borrow_mut()
            .push(format!("hook argument sub1 at {}", ctx.identifier()));
        Ok(())
    }

    fn flag_verbose(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("hook verbose at {}", ctx.identifier()));
        Ok(())
    }

    fn option_env(&mut self, _ctx: &mut Context<'_>, value: &str) -> Result<()> {
        self.log.borrow_mut().push(format!("hook env={}", value));
        Ok(())
    }
}

impl Command for Root {
    fn help(&self) -> &str {
        "
            Usage: app <command>
              deploy    Deploy things
        "
    }

    fn requires_args(&self) -> bool {
        self.requires_args
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("init {}", describe(ctx)));
        Ok(())
    }

    fn routes(routes: &mut Routes<Self>) {
        routes
            .method("deploy", Self::run_deploy)
            .method("trigger", Self::run_trigger)
            .method("isolated", Self::run_isolated)
            .method("restart", Self::run_restart)
            .method("fail", Self::run_fail)
            .method("need", Self::run_need)
            .method("orphan", Self::run_orphan)
            .method("checked", Self::run_checked)
            .method("reroute", Self::run_reroute)
            .on_flag("verbose", Self::flag_verbose)
            .on_option("env", Self::option_env)
            .on_argument("sub1", Self::argument_sub1);
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.log.borrow_mut().push(format!("default {}", describe(ctx)));
        Ok(())
    }
}

/// A nested command that records where it ran and who its parents were.
struct Nested {
    log: Log,
}

impl Command for Nested {
    fn help(&self) -> &str {
        "Usage: nested"
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let parent = ctx.parent()?.identifier().to_string();
        let root = ctx.parent_named("App")?;
        let root_positionals = root.args().positionals().to_vec();
        self.log.borrow_mut().push(format!(
            "nested {} parent={} root_pos={:?}",
            describe(ctx),
            parent,
            root_positionals
        ));
        Ok(())
    }
}

/// A nested command relying on the trait's default `run`.
#[derive(Default)]
struct Bare;

impl Command for Bare {
    fn help(&self) -> &str {
        "Bare help"
    }
}

fn app_with(settings: Settings, log: &Log, requires_args: bool) -> App {
    let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
    App::new(settings)
        .register_with("App", move || Root {
            log: l1.clone(),
            requires_args,
        })
        .register_with("App_Sub1", move || Nested { log: l2.clone() })
        .register_with("App_Sub1_Sub2", move || Nested { log: l3.clone() })
        .register_with("App_Release", move || Nested { log: l4.clone() })
        .register::<Bare>("App_Bare")
}

fn app(log: &Log) -> App {
    app_with(Settings::default().with_colors(ColorMode::Never), log, false)
}

#[test]
fn test_local_method_receives_shifted_positionals() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["deploy", "--env=prod", "-v", "service-a"], &mut out)
        .unwrap();

    let log = entries(&log);
    assert_eq!(
        log[0],
        r#"init App pos=["deploy", "service-a"] flags={"v"} opts={"env": "prod"} depth=0"#
    );
    assert_eq!(log[1], "hook env=prod");
    assert_eq!(
        log[2],
        r#"method deploy App pos=["service-a"] flags={"v"} opts={"env": "prod"} depth=0"#
    );
    assert_eq!(log.len(), 3);
}

#[test]
fn test_empty_input_on_command_requiring_args_shows_help() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");
    let app = app_with(Settings::default(), &log, true);

    let err = app.dispatch(Vec::<String>::new(), &mut out).unwrap_err();

    assert!(matches!(err, CascadeError::HelpShown { requested: false }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(captured.contents(), "Usage: app <command>\n  deploy    Deploy things\n");
    assert!(!entries(&log).iter().any(|l| l.starts_with("default")));
}

#[test]
fn test_empty_input_runs_default_action() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(Vec::<String>::new(), &mut out).unwrap();

    assert!(entries(&log).iter().any(|l| l.starts_with("default App pos=[]")));
}

#[test]
fn test_manual_run_merges_caller_positionals() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(["trigger", "extra"], &mut out).unwrap();

    let log = entries(&log);
    assert_eq!(log[1], "method trigger");
    // the manual run starts from the root with the caller appended to the chain
    assert_eq!(
        log[2],
        r#"init App pos=["restart", "extra"] flags={"force"} opts={} depth=1"#
    );
    assert_eq!(
        log[3],
        r#"method restart App pos=["extra"] flags={"force"} opts={} depth=1"#
    );
    assert_eq!(log[4], "trigger done");
}

#[test]
fn test_manual_run_inherits_flags_and_options() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["trigger", "--verbose", "--env=dev"], &mut out)
        .unwrap();

    let log = entries(&log);
    let restart = log.iter().find(|l| l.starts_with("method restart")).unwrap();
    assert!(restart.contains(r#"flags={"force", "verbose"}"#));
    assert!(restart.contains(r#"opts={"env": "dev"}"#));
    // hooks fire again in the re-entered root
    assert_eq!(log.iter().filter(|l| *l == "hook env=dev").count(), 2);
}

#[test]
fn test_manual_run_with_overrides() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["isolated", "leftover", "--verbose"], &mut out)
        .unwrap();

    let log = entries(&log);
    let restart = log.iter().find(|l| l.starts_with("method restart")).unwrap();
    assert_eq!(restart, "method restart App pos=[] flags={} opts={} depth=1");
}

#[test]
fn test_three_levels_deep_parent_lookup() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(["sub1", "sub2", "leaf"], &mut out).unwrap();

    let nested = entries(&log)
        .into_iter()
        .find(|l| l.starts_with("nested"))
        .unwrap();
    assert_eq!(
        nested,
        r#"nested App_Sub1_Sub2 pos=["leaf"] flags={} opts={} depth=2 parent=App_Sub1 root_pos=["sub1", "sub2", "leaf"]"#
    );
}

#[test]
fn test_nested_command_wins_over_method() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");
    let app = app(&log);
    // "deploy" is a method on the root; registering App_Deploy must take precedence
    let l = log.clone();
    let app = app.register_with("App_Deploy", move || Nested { log: l.clone() });

    app.dispatch(["deploy", "x"], &mut out).unwrap();

    let log = entries(&log);
    assert!(log.iter().any(|l| l.starts_with("nested App_Deploy")));
    assert!(!log.iter().any(|l| l.starts_with("method deploy")));
}

#[test]
fn test_command_word_is_case_insensitive() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(["RELEASE"], &mut out).unwrap();

    assert!(entries(&log)
        .iter()
        .any(|l| l.starts_with("nested App_Release pos=[]")));
}

#[test]
fn test_children_inherit_flags_and_options() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["release", "--force", "--tag=v1"], &mut out)
        .unwrap();

    let nested = entries(&log)
        .into_iter()
        .find(|l| l.starts_with("nested"))
        .unwrap();
    assert!(nested.contains(r#"flags={"force"} opts={"tag": "v1"} depth=1"#));
}

#[test]
fn test_unresolved_word_falls_back_to_default() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(["nonsense", "more"], &mut out).unwrap();

    assert!(entries(&log)
        .iter()
        .any(|l| l.starts_with(r#"default App pos=["nonsense", "more"]"#)));
}

#[test]
fn test_hooks_run_for_registered_names_only() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["--verbose", "--quiet", "--region=eu"], &mut out)
        .unwrap();

    let log = entries(&log);
    assert_eq!(log[1], "hook verbose at App");
    assert!(log[2].starts_with("default"));
    assert!(!log.iter().any(|l| l.starts_with("hook") && l.contains("region")));
}

#[test]
fn test_help_flag_shows_help_of_resolved_command() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");

    let err = app(&log).dispatch(["bare", "--help"], &mut out).unwrap_err();

    assert!(matches!(err, CascadeError::HelpShown { requested: true }));
    assert_eq!(err.exit_code(), 0);
    assert_eq!(captured.contents(), "Bare help\n");
}

#[test]
fn test_help_flag_replaces_local_method() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    let err = app(&log).dispatch(["deploy", "--help"], &mut out).unwrap_err();

    assert!(matches!(err, CascadeError::HelpShown { requested: true }));
    assert!(!entries(&log).iter().any(|l| l.starts_with("method deploy")));
}

#[test]
fn test_default_run_shows_help() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");

    let err = app(&log).dispatch(["bare"], &mut out).unwrap_err();

    assert!(matches!(err, CascadeError::HelpShown { requested: false }));
    assert_eq!(captured.contents(), "Bare help\n");
}

#[test]
fn test_bail_is_reported_with_label() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");
    let app = app(&log);

    let err = app.dispatch(["fail"], &mut out).unwrap_err();
    assert!(matches!(err, CascadeError::Bail(ref m) if m == "something broke"));

    app.report(&err, &mut out).unwrap();
    assert_eq!(captured.contents(), "\nERROR: something broke\n");
}

#[test]
fn test_no_colors_flag_disables_styling() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");
    out.set_colors(true);
    let app = app_with(Settings::default(), &log, false);

    let err = app.dispatch(["fail", "--no-colors"], &mut out).unwrap_err();
    app.report(&err, &mut out).unwrap();

    assert!(!captured.contents().contains('\u{1b}'));
}

#[test]
fn test_assertion_failure_shows_help() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");
    let app = app(&log);

    let err = app.dispatch(["need", "one"], &mut out).unwrap_err();
    assert!(matches!(err, CascadeError::MissingArgument(_)));
    assert!(captured.contents().starts_with("Usage: app <command>"));

    // help was already written, reporting adds nothing
    app.report(&err, &mut out).unwrap();
    assert!(!captured.contents().contains("ERROR"));

    app.dispatch(["need", "one", "two"], &mut out).unwrap();
    assert!(entries(&log).contains(&"need satisfied".to_string()));
}

#[test]
fn test_root_has_no_parent() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    let err = app(&log).dispatch(["orphan"], &mut out).unwrap_err();
    assert!(matches!(err, CascadeError::NoParentInChain { filter: None }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_unknown_root() {
    let (mut out, _) = Output::capture("");
    let app = App::new(Settings::default().with_root("Missing"));

    let err = app.dispatch(["x"], &mut out).unwrap_err();
    assert!(matches!(err, CascadeError::UnknownRoot(ref r) if r == "Missing"));
}

#[test]
fn test_lookahead_grammar_from_settings() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");
    let settings = Settings::default().with_grammar(Grammar::Lookahead);

    app_with(settings, &log, false)
        .dispatch(["deploy", "--env", "prod", "svc"], &mut out)
        .unwrap();

    let log = entries(&log);
    assert_eq!(log[1], "hook env=prod");
    assert!(log[2].starts_with(r#"method deploy App pos=["svc"]"#));
}

#[test]
fn test_dispatch_is_repeatable() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");
    let app = app(&log);

    app.dispatch(["deploy", "a"], &mut out).unwrap();
    app.dispatch(["deploy", "a"], &mut out).unwrap();

    let log = entries(&log);
    assert_eq!(log[0..2], log[2..4]);
}

#[test]
fn test_argument_hook_fires_before_delegation() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log).dispatch(["SUB1", "--x"], &mut out).unwrap();

    let log = entries(&log);
    assert_eq!(log[1], "hook argument sub1 at App");
    assert!(log[2].starts_with(r#"nested App_Sub1 pos=[] flags={"x"}"#));
    assert_eq!(log.len(), 3);
}

#[test]
fn test_argument_hooks_run_after_flag_and_option_hooks() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["deploy", "sub1", "--verbose", "--env=qa"], &mut out)
        .unwrap();

    let log = entries(&log);
    assert_eq!(log[1], "hook verbose at App");
    assert_eq!(log[2], "hook env=qa");
    // a positional that is not the command word still reaches its hook
    assert_eq!(log[3], "hook argument sub1 at App");
    assert!(log[4].starts_with(r#"method deploy App pos=["sub1"]"#));
}

#[test]
fn test_presence_assertions_pass() {
    let log = Log::default();
    let (mut out, captured) = Output::capture("");

    app(&log)
        .dispatch(["checked", "target", "--yes", "--env=qa"], &mut out)
        .unwrap();

    assert!(entries(&log).contains(&"checked".to_string()));
    assert_eq!(captured.contents(), "");
}

#[test]
fn test_presence_assertion_failures_show_help() {
    let cases: [(&[&str], &str); 3] = [
        (&["checked", "--yes", "--env=qa"], "argument target"),
        (&["checked", "target", "--env=qa"], "flag --yes"),
        (&["checked", "target", "--yes"], "option --env=<value>"),
    ];

    for (input, missing) in cases {
        let log = Log::default();
        let (mut out, captured) = Output::capture("");
        let app = app(&log);

        let err = app.dispatch(input.iter().copied(), &mut out).unwrap_err();
        assert!(
            matches!(err, CascadeError::MissingArgument(ref m) if m == missing),
            "{input:?} gave {err:?}"
        );
        assert_eq!(err.exit_code(), 1);
        assert!(captured.contents().starts_with("Usage: app <command>"));

        app.report(&err, &mut out).unwrap();
        assert!(!captured.contents().contains("ERROR"));
        assert!(!entries(&log).contains(&"checked".to_string()));
    }
}

#[test]
fn test_replaced_arguments_flow_into_manual_run() {
    let log = Log::default();
    let (mut out, _) = Output::capture("");

    app(&log)
        .dispatch(["reroute", "dropped", "--verbose"], &mut out)
        .unwrap();

    let log = entries(&log);
    let nested = log.iter().find(|l| l.starts_with("nested")).unwrap();
    assert!(
        nested.starts_with(
            r#"nested App_Release pos=["leftover"] flags={} opts={"tag": "v2"} depth=2 parent=App"#
        ),
        "{nested}"
    );
    // the replaced flags no longer carry --verbose into the re-entered root
    assert_eq!(log.iter().filter(|l| l.starts_with("hook verbose")).count(), 1);
}

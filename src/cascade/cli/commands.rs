//! A small service-manager command tree built on cascade.
//!
//! ```text
//! App                 status, version, --verbose, --env=<name>
//! ├── App_Service     restart, list, redeploy
//! │   └── App_Service_Logs
//! └── App_Deploy
//! ```

use cascade::{Color, Command, Context, ManualRun, Result, Routes};

const SERVICES: &[(&str, &str)] = &[
    ("api", "running"),
    ("database", "running"),
    ("web", "stopped"),
    ("worker", "running"),
];

const ENVIRONMENTS: &[&str] = &["dev", "staging", "prod"];

const DEFAULT_LOG_LINES: usize = 10;

fn is_known_service(name: &str) -> bool {
    SERVICES.iter().any(|(known, _)| *known == name)
}

fn ancestry_path(ctx: &Context<'_>) -> String {
    ctx.call_structure()
        .frames()
        .iter()
        .map(|f| f.identifier())
        .collect::<Vec<_>>()
        .join(" > ")
}

const ROOT_HELP: &str = "
    Usage: cascade <command> [options]

    Commands:
      status [service...]    Show service states
      service <action>       Manage a single service
      deploy <service>       Deploy a service
      version                Print the version

    Options:
      --env=<name>           Target environment (dev, staging, prod)
      --verbose              Print what is happening
      --no-colors            Disable colored output
      --help                 Show help for any command
";

#[derive(Default)]
pub struct Root {
    verbose: bool,
}

impl Root {
    fn flag_verbose(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.verbose = true;
        ctx.debug("verbose output enabled")
    }

    fn option_env(&mut self, _ctx: &mut Context<'_>, value: &str) -> Result<()> {
        tracing::info!(env = value, "environment selected");
        Ok(())
    }

    fn run_status(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let wanted = ctx.positionals().to_vec();
        let rows: Vec<Vec<String>> = SERVICES
            .iter()
            .filter(|(name, _)| wanted.is_empty() || wanted.iter().any(|w| w == name))
            .map(|(name, state)| {
                let color = if *state == "running" {
                    Color::Green
                } else {
                    Color::Red
                };
                vec![name.to_string(), ctx.color_text(state, color)]
            })
            .collect();

        if rows.is_empty() {
            return ctx.bail(format!("unknown service: {}", wanted.join(" ")));
        }
        ctx.table(&["SERVICE", "STATE"], &rows)?;
        if self.verbose {
            ctx.debug(&format!("{} of {} services shown", rows.len(), SERVICES.len()))?;
        }
        Ok(())
    }

    fn run_version(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.info(&format!("cascade {}", env!("CARGO_PKG_VERSION")))
    }
}

impl Command for Root {
    fn help(&self) -> &str {
        ROOT_HELP
    }

    fn routes(routes: &mut Routes<Self>) {
        routes
            .method("status", Self::run_status)
            .method("version", Self::run_version)
            .on_flag("verbose", Self::flag_verbose)
            .on_option("env", Self::option_env);
    }
}

const SERVICE_HELP: &str = "
    Usage: cascade service <action> <service>

    Actions:
      restart <service> [--force]    Restart a service, asking first unless forced
      redeploy <service>             Deploy the service again with --force
      list                           List services and their states
      logs <service> [--lines=N]     Show recent log lines
";

#[derive(Default)]
pub struct Service;

impl Service {
    fn run_restart(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_num_positionals(1)?;
        let name = ctx.positionals()[0].clone();
        if !is_known_service(&name) {
            return ctx.bail(format!("unknown service: {}", name));
        }

        if !ctx.has_flag("force") && !ctx.confirm(&format!("Restart {}? [y/N]", name))? {
            return ctx.info("aborted");
        }
        ctx.info(&format!("restarting {}", name))
    }

    fn run_list(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.key_list(SERVICES)
    }

    fn run_redeploy(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_num_positionals(1)?;
        ctx.manual_run(ManualRun::line("deploy --force"))
    }
}

impl Command for Service {
    fn help(&self) -> &str {
        SERVICE_HELP
    }

    fn requires_args(&self) -> bool {
        true
    }

    fn routes(routes: &mut Routes<Self>) {
        routes
            .method("restart", Self::run_restart)
            .method("list", Self::run_list)
            .method("redeploy", Self::run_redeploy);
    }
}

const LOGS_HELP: &str = "
    Usage: cascade service logs <service> [--lines=N]
";

#[derive(Default)]
pub struct ServiceLogs;

impl Command for ServiceLogs {
    fn help(&self) -> &str {
        LOGS_HELP
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_num_positionals(1)?;
        let name = ctx.positionals()[0].clone();
        if !is_known_service(&name) {
            return ctx.bail(format!("unknown service: {}", name));
        }

        let lines = match ctx.option("lines") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) => n,
                Err(_) => return ctx.bail(format!("--lines expects a number, got {}", raw)),
            },
            None => DEFAULT_LOG_LINES,
        };

        let caller = ctx.parent()?.identifier().to_string();
        let path = ancestry_path(ctx);
        ctx.info(&format!(
            "last {} lines of {} (called from {}, path {})",
            lines, name, caller, path
        ))
    }
}

const DEPLOY_HELP: &str = "
    Usage: cascade deploy <service> [--env=<name>] [--dry-run] [--force]

    Deploys to dev unless --env is given. Deploying to prod asks for
    confirmation unless --force is present.
";

#[derive(Default)]
pub struct Deploy;

impl Command for Deploy {
    fn help(&self) -> &str {
        DEPLOY_HELP
    }

    fn requires_args(&self) -> bool {
        true
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.assert_num_positionals(1)?;
        let name = ctx.positionals()[0].clone();
        if !is_known_service(&name) {
            return ctx.bail(format!("unknown service: {}", name));
        }

        let env = ctx.option("env").unwrap_or("dev").to_string();
        if !ENVIRONMENTS.contains(&env.as_str()) {
            return ctx.bail(format!("unknown environment: {}", env));
        }

        if ctx.has_flag("dry-run") {
            return ctx.info(&format!("would deploy {} to {}", name, env));
        }

        if env == "prod"
            && !ctx.has_flag("force")
            && !ctx.confirm(&format!("Deploy {} to prod? [y/N]", name))?
        {
            return ctx.info("aborted");
        }

        ctx.info(&format!("deploying {} to {}", name, env))?;
        if ctx.call_structure().len() > 1 {
            let path = ancestry_path(ctx);
            ctx.info(&format!("triggered via {}", path))?;
        }
        Ok(())
    }
}

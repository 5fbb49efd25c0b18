//! t32 CLI - コマンドラインインターフェース
//!
//! TRACE32 にコマンドを送り、式の評価結果やウィンドウ・AREA の内容を
//! 標準出力に書き出します。失敗した場合はエラーを表示して
//! 0以外の終了ステータスで終了します。

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use t32_api::{ApiConfig, ApiInterface};
use t32_core::command::DEFAULT_AREA;
use t32_core::Command;
use t32_rem::{RemConfig, RemInterface};

/// t32 - TRACE32 remote control
#[derive(Parser, Debug)]
#[command(name = "t32")]
#[command(version = "0.1.0")]
#[command(about = "Send commands to a running TRACE32 instance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: T32Command,

    /// Transport used to talk to TRACE32
    #[arg(
        long,
        global = true,
        env = "T32_TRANSPORT",
        value_enum,
        default_value_t = Transport::Api
    )]
    transport: Transport,

    /// Host running TRACE32
    #[arg(long, global = true, env = "T32NODE")]
    node: Option<String>,

    /// Remote API port (t32api transport)
    #[arg(long, global = true, env = "T32PORT")]
    port: Option<u16>,

    /// Path of the t32rem tool (t32rem transport)
    #[arg(long, global = true, env = "T32REM")]
    t32rem: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    /// t32api shared library
    Api,
    /// t32rem command line tool
    Rem,
}

#[derive(Subcommand, Debug)]
enum T32Command {
    /// Run a command and wait for execution (unlike t32rem)
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },

    /// Call a function and print the result to stdout
    Echo {
        #[arg(allow_hyphen_values = true)]
        arg: String,
    },

    /// Wait for pending command execution (until T32_GetPracticeState reports NOT_RUNNING)
    Wait,

    /// Print a window to stdout
    Winprint {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },

    /// Print an AREA to stdout
    Areacat {
        #[arg(default_value = DEFAULT_AREA)]
        area_name: String,
    },
}

impl From<T32Command> for Command {
    fn from(command: T32Command) -> Self {
        match command {
            T32Command::Run { cmd } => Command::Run(cmd),
            T32Command::Echo { arg } => Command::Echo(arg),
            T32Command::Wait => Command::Wait,
            T32Command::Winprint { mut cmd } => {
                // clap が1つ以上を保証している
                let window = cmd.remove(0);
                Command::WinPrint { window, args: cmd }
            }
            T32Command::Areacat { area_name } => Command::AreaCat(area_name),
        }
    }
}

impl Cli {
    fn api_config(&self) -> ApiConfig {
        let mut config = ApiConfig::default();
        if let Some(node) = &self.node {
            config.node = node.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }

    fn rem_config(&self) -> RemConfig {
        let mut config = RemConfig::default();
        if let Some(node) = &self.node {
            config.host = node.clone();
        }
        if let Some(t32rem) = &self.t32rem {
            config.command = vec![t32rem.clone()];
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let api_config = cli.api_config();
    let rem_config = cli.rem_config();
    let command = Command::from(cli.command);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.transport {
        Transport::Api => {
            ApiInterface::session(api_config, |t32| command.execute(t32, &mut out))
                .context("t32api command failed")?;
        }
        Transport::Rem => {
            let mut t32 = RemInterface::new(rem_config);
            command
                .execute(&mut t32, &mut out)
                .context("t32rem command failed")?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("failed to parse")
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = parse(&["t32", "run", "Data.Set", "0x0", "%Long", "0"]);
        assert_eq!(
            Command::from(cli.command),
            Command::Run(vec!["Data.Set".into(), "0x0".into(), "%Long".into(), "0".into()])
        );

        let cli = parse(&["t32", "echo", "1+1"]);
        assert_eq!(Command::from(cli.command), Command::Echo("1+1".into()));

        let cli = parse(&["t32", "wait"]);
        assert_eq!(Command::from(cli.command), Command::Wait);

        let cli = parse(&["t32", "winprint", "Register.view", "/SpotLight"]);
        assert_eq!(
            Command::from(cli.command),
            Command::WinPrint {
                window: "Register.view".into(),
                args: vec!["/SpotLight".into()],
            }
        );

        let cli = parse(&["t32", "areacat"]);
        assert_eq!(Command::from(cli.command), Command::AreaCat("A000".into()));
    }

    #[test]
    fn test_parse_requires_arguments() {
        assert!(Cli::try_parse_from(["t32", "run"]).is_err());
        assert!(Cli::try_parse_from(["t32", "winprint"]).is_err());
        assert!(Cli::try_parse_from(["t32", "echo"]).is_err());
        assert!(Cli::try_parse_from(["t32"]).is_err());
    }

    #[test]
    fn test_transport_options() {
        let cli = parse(&[
            "t32",
            "--transport",
            "rem",
            "--node",
            "board1",
            "--t32rem",
            "/opt/t32/bin/t32rem",
            "wait",
        ]);
        assert_eq!(cli.transport, Transport::Rem);
        let rem = cli.rem_config();
        assert_eq!(rem.host, "board1");
        assert_eq!(rem.command, vec!["/opt/t32/bin/t32rem"]);

        let cli = parse(&["t32", "--node", "10.0.0.2", "--port", "20001", "echo", "1+1"]);
        let api = cli.api_config();
        assert_eq!(api.node, "10.0.0.2");
        assert_eq!(api.port, 20001);
        assert_eq!(api.packlen, 1024);
    }
}

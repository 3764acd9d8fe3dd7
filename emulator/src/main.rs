mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use session::Session;
use timer_core::config::TimerConfig;
use timer_core::console;

const USAGE: &str = "Usage: timer-emulator [--duration <seconds>] [--clock <hh:mm:ss>] [--lux <n>]";

struct Options {
    config: TimerConfig,
    lux: u32,
}

fn main() -> io::Result<()> {
    let options = parse_options().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(options.config, options.lux);
    let mut line = String::new();

    writeln!(
        writer,
        "Countdown Timer Emulator ready. Type `help` for commands or `exit` to quit."
    )?;
    for response in session.drain_telemetry() {
        writeln!(writer, "{response}")?;
    }

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_options() -> Result<Options, String> {
    let mut config = TimerConfig::DEFAULT;
    let mut lux = 0;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        let value = match inline {
            Some(value) => value,
            None => args
                .next()
                .ok_or_else(|| format!("Expected value after {flag}"))?,
        };

        match flag.as_str() {
            "--duration" => {
                config.initial_duration = value
                    .parse()
                    .map_err(|_| format!("Invalid duration `{value}`"))?;
            }
            "--clock" => {
                config.boot_clock = console::parse_wall_clock(&value)
                    .map_err(|err| format!("Invalid clock `{value}`: {err}"))?;
            }
            "--lux" => {
                lux = value
                    .parse()
                    .map_err(|_| format!("Invalid lux reading `{value}`"))?;
            }
            other => return Err(format!("Unknown option `{other}`")),
        }
    }

    config.validate().map_err(|err| err.to_string())?;
    Ok(Options { config, lux })
}

use timer_core::arbiter::RunState;
use timer_core::config::TimerConfig;
use timer_core::console::{self, ConsoleCommand, ConsoleError};
use timer_core::controller::TimerController;
use timer_core::hw::{StatusColor, WallClockSource};
use timer_core::input::JoystickMask;
use timer_core::presentation::format_countdown;
use timer_core::sim::VirtualBoard;
use timer_core::telemetry::{EventId, TelemetryLog};

pub const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "button",
        "button [ticks]                 - hold the push-button for some iterations",
    ),
    (
        "joy",
        "joy <center|up|down|left|right> [ticks] - hold the joystick",
    ),
    (
        "rotate",
        "rotate <left|right> [count]    - turn the encoder one detent per iteration",
    ),
    ("tick", "tick <n>                       - run idle loop iterations"),
    (
        "advance",
        "advance <n>[s]                 - move the wall clock, then run one iteration",
    ),
    ("clock", "clock <hh:mm:ss>               - set the wall clock"),
    ("lux", "lux <n>                        - set the ambient light reading"),
    ("status", "status                         - display timer state"),
    ("help", "help [topic]                   - show help for a command"),
];

/// Interactive wrapper around a controller driving a virtual board.
pub struct Session {
    controller: TimerController,
    board: VirtualBoard,
    telemetry: TelemetryLog,
    drained: EventId,
}

impl Session {
    pub fn new(config: TimerConfig, lux: u32) -> Self {
        let mut board = VirtualBoard::new();
        board.set_lux(lux);
        let mut telemetry = TelemetryLog::new();
        let mut controller = TimerController::new(config);
        controller.boot(&mut board, &mut telemetry);

        Self {
            controller,
            board,
            telemetry,
            drained: 0,
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        match console::parse(line) {
            Ok(command) => self.execute(command),
            Err(ConsoleError::Empty) => Vec::new(),
            Err(err) => vec![format!("ERR syntax {err}")],
        }
    }

    /// Telemetry recorded since the previous drain, one line per record.
    pub fn drain_telemetry(&mut self) -> Vec<String> {
        let lines = self
            .telemetry
            .since(self.drained)
            .map(ToString::to_string)
            .collect();
        self.drained = self.telemetry.next_id();
        lines
    }

    fn execute(&mut self, command: ConsoleCommand<'_>) -> Vec<String> {
        match command {
            ConsoleCommand::Button { ticks } => {
                self.board.set_button(true);
                self.run(ticks);
                self.board.set_button(false);
            }
            ConsoleCommand::Joystick { direction, ticks } => {
                self.board.set_joystick(direction);
                self.run(ticks);
                self.board.set_joystick(JoystickMask::NONE);
            }
            ConsoleCommand::Rotate { step, count } => {
                for _ in 0..count {
                    self.board.queue_rotary(step);
                    self.run(1);
                }
            }
            ConsoleCommand::Tick(iterations) => self.run(iterations),
            ConsoleCommand::Advance(seconds) => {
                self.board.advance_clock(seconds);
                self.run(1);
            }
            ConsoleCommand::Clock(time) => {
                self.board.set_time(time);
                return vec![format!("OK clock {time}")];
            }
            ConsoleCommand::Lux(lux) => {
                self.board.set_lux(lux);
                return vec![format!("OK lux {lux}")];
            }
            ConsoleCommand::Status => return self.status_lines(),
            ConsoleCommand::Help(topic) => return help_lines(topic),
        }

        let mut lines = self.drain_telemetry();
        lines.push(format!(
            "OK iterations={} state={}",
            self.controller.iterations(),
            state_label(self.controller.context().run_state())
        ));
        lines
    }

    fn run(&mut self, iterations: u32) {
        for _ in 0..iterations {
            self.controller.step(&mut self.board, &mut self.telemetry);
        }
    }

    pub fn status_lines(&self) -> Vec<String> {
        let context = self.controller.context();
        let motor = context.arbiter.motor();
        let mut lines = vec![
            format!(
                "state={} duration={} clock={} digit={}",
                state_label(context.run_state()),
                format_countdown(context.duration()),
                self.board.clock(),
                context.digit.as_char()
            ),
            format!(
                "motor offset={} levels={:08b} pwm={}",
                motor.offset(),
                motor.levels(),
                self.board
                    .pwm_compare()
                    .map_or_else(|| "off".to_string(), |value| value.to_string())
            ),
            format!(
                "led={} lux={} cooldown={}",
                describe_status(self.board.status()),
                context
                    .last_lux
                    .map_or_else(|| "-".to_string(), |lux| lux.to_string()),
                context.interaction.remaining()
            ),
        ];
        for slot in self.board.screen() {
            lines.push(format!("  ({},{}) {}", slot.x, slot.y, slot.text));
        }
        lines
    }
}

fn help_lines(topic: Option<&str>) -> Vec<String> {
    match topic {
        None => {
            let mut lines = vec!["Commands:".to_string()];
            lines.extend(HELP_TOPICS.iter().map(|(_, usage)| format!("  {usage}")));
            lines
        }
        Some(topic) => match HELP_TOPICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(topic))
        {
            Some((_, usage)) => vec![(*usage).to_string()],
            None => vec![format!(
                "ERR unknown topic `{topic}` (try: {})",
                help_topic_list()
            )],
        },
    }
}

fn help_topic_list() -> String {
    HELP_TOPICS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "idle",
        RunState::Armed => "armed",
        RunState::Expired => "expired",
    }
}

fn describe_status(color: StatusColor) -> String {
    let names: Vec<&str> = [
        (StatusColor::RED, "red"),
        (StatusColor::GREEN, "green"),
        (StatusColor::BLUE, "blue"),
    ]
    .into_iter()
    .filter(|(channel, _)| color.contains(*channel))
    .map(|(_, name)| name)
    .collect();

    if names.is_empty() {
        "off".to_string()
    } else {
        names.join("+")
    }
}

use timer_core::controller::TimerController;
use timer_core::telemetry::TelemetryLog;

use crate::hw::ApplianceBoard;
use crate::telemetry::DefmtMirror;

/// Owns the board for the lifetime of the firmware; never yields.
#[embassy_executor::task]
pub async fn run(
    mut controller: TimerController,
    mut board: ApplianceBoard,
    mut telemetry: TelemetryLog,
    mut mirror: DefmtMirror,
) -> ! {
    controller.run(&mut board, &mut telemetry, |log| mirror.drain(log));
}

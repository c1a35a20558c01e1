//! Flight control loop example
//!
//! Three periodic tasks sharing an `AircraftState` through an `Rc<RefCell<_>>`:
//! a fast attitude controller, a mid-rate fuel monitor, and a slow telemetry
//! logger. Demonstrates the host-kernel call order: register every task,
//! `start()`, then drive the simulation forward with repeated `tick()`.

use std::cell::RefCell;
use std::rc::Rc;

use rtkernel_sim::{AircraftState, DeadlineKind, Kernel, Task};
use tracing::info;

struct AttitudeController {
    state: Rc<RefCell<AircraftState>>,
}

impl Task for AttitudeController {
    fn name(&self) -> &str {
        "AttitudeController"
    }
    fn total_steps(&self) -> u32 {
        1
    }
    fn current_step(&self) -> u32 {
        0
    }
    fn current_step_wcet(&self) -> f64 {
        0.001
    }
    fn initialize(&mut self) {}
    fn execute_step(&mut self) {
        let mut s = self.state.borrow_mut();
        s.pitch_command = s.pitch_input * 0.8;
        s.roll_command = s.roll_input * 0.8;
        s.yaw_command = s.yaw_input * 0.5;
    }
    fn reset_for_next_period(&mut self) {}
    fn cleanup(&mut self) {}
}

struct FuelMonitor {
    state: Rc<RefCell<AircraftState>>,
}

impl Task for FuelMonitor {
    fn name(&self) -> &str {
        "FuelMonitor"
    }
    fn total_steps(&self) -> u32 {
        1
    }
    fn current_step(&self) -> u32 {
        0
    }
    fn current_step_wcet(&self) -> f64 {
        0.0005
    }
    fn initialize(&mut self) {}
    fn execute_step(&mut self) {
        let mut s = self.state.borrow_mut();
        s.fuel_remaining_liters -= s.fuel_consumption_rate;
        s.fuel_low_warning = s.fuel_remaining_liters < 0.2 * s.fuel_capacity_liters;
    }
    fn reset_for_next_period(&mut self) {}
    fn cleanup(&mut self) {}
}

struct TelemetryLogger {
    state: Rc<RefCell<AircraftState>>,
}

impl Task for TelemetryLogger {
    fn name(&self) -> &str {
        "TelemetryLogger"
    }
    fn total_steps(&self) -> u32 {
        1
    }
    fn current_step(&self) -> u32 {
        0
    }
    fn current_step_wcet(&self) -> f64 {
        0.002
    }
    fn initialize(&mut self) {}
    fn execute_step(&mut self) {
        let s = self.state.borrow();
        info!(altitude = s.altitude, fuel = s.fuel_remaining_liters, "telemetry");
    }
    fn reset_for_next_period(&mut self) {}
    fn cleanup(&mut self) {}
}

fn main() {
    tracing_subscriber::fmt::init();

    let state = Rc::new(RefCell::new(AircraftState {
        fuel_remaining_liters: 500.0,
        fuel_capacity_liters: 500.0,
        fuel_consumption_rate: 0.02,
        altitude: 8000.0,
        ..Default::default()
    }));

    let mut kernel = Kernel::new();
    kernel
        .register_task(
            Box::new(AttitudeController { state: state.clone() }),
            0,
            0.010,
            0.0,
            DeadlineKind::Hard,
        )
        .expect("register attitude controller");
    kernel
        .register_task(
            Box::new(FuelMonitor { state: state.clone() }),
            1,
            0.100,
            0.0,
            DeadlineKind::Soft,
        )
        .expect("register fuel monitor");
    kernel
        .register_task(Box::new(TelemetryLogger { state: state.clone() }), 2, 1.000, 0.0, DeadlineKind::None)
        .expect("register telemetry logger");

    kernel.start().expect("kernel start");

    for _ in 0..1000 {
        kernel.tick(0.010).expect("tick");
    }

    let status = kernel.status();
    info!(?status, misses = kernel.deadline_manager().total_miss(), "simulation finished");
}

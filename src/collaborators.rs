//! Shared-state record consumed by external collaborators
//!
//! The kernel never reads or writes any field here; this struct exists
//! only to fix the contract between the application tasks that write it
//! and the host's physics/rendering/HAL layers that read it. Giving it
//! methods or invariants would mean inventing application logic this
//! crate has no business owning.

use serde::Serialize;

/// A plain, mutable shared-state record. Tasks write disjoint fields by
/// convention; nothing here is enforced by the kernel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AircraftState {
    // ============ Attitude ============
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,

    // ============ Kinematics ============
    pub velocity: f64,
    pub altitude: f64,
    pub vertical_speed: f64,
    pub position: [f64; 3],
    pub velocity_vector: [f64; 3],
    pub local_velocity: [f64; 3],
    pub angular_vector: [f64; 3],
    pub g_force: f64,
    pub angle_of_attack: f64,
    pub sideslip_angle: f64,
    pub air_density: f64,
    pub dynamic_pressure: f64,

    // ============ Pilot input ============
    pub pitch_input: f64,
    pub roll_input: f64,
    pub yaw_input: f64,
    pub throttle_input: f64,

    // ============ Control command ============
    pub pitch_command: f64,
    pub roll_command: f64,
    pub yaw_command: f64,
    pub throttle_command: f64,
    pub thrust_force_command: [f64; 3],
    pub aero_force_command: [f64; 3],
    pub torque_command: [f64; 3],

    // ============ Engine / fuel ============
    pub engine_rpm: f64,
    pub engine_temp: f64,
    pub overheat_warning: bool,
    pub overheat_critical: bool,
    pub thrust_limit_scale: f64,
    pub fuel_level: f64,
    pub fuel_remaining_liters: f64,
    pub fuel_capacity_liters: f64,
    pub fuel_consumption_rate: f64,
    pub throttle_limit: f64,
    pub fuel_low_warning: bool,
    pub fuel_critical_warning: bool,
    pub bingo_fuel: bool,
    pub joker_fuel: bool,
    pub endurance_minutes: f64,
    pub range_km: f64,

    // ============ Weapons / targeting ============
    pub missile_count: u32,
    pub hardpoint_ammo_count: Vec<u32>,
    pub hardpoint_ready: Vec<bool>,
    pub hardpoint_jammed: Vec<bool>,
    pub hardpoint_weapon_type: Vec<u32>,
    pub total_hardpoints: u32,
    pub selected_hardpoint_index: u32,
    pub missile_life_time_seconds: f64,
    pub weapon_fire_request: bool,
    pub weapon_fire_ack: bool,
    pub weapon_ready: bool,
    pub weapon_jammed: bool,
    pub weapon_jam_message: String,
    pub locked_target_valid: bool,
    pub locked_target_id: u32,
    pub locked_target_position: [f64; 3],
    pub locked_target_distance: f64,
    pub locked_target_angle: f64,
    pub target_candidate_available: bool,
    pub target_candidate_id: u32,
    pub target_candidate_position: [f64; 3],
    pub target_candidate_distance: f64,
    pub target_candidate_angle: f64,
    pub fire_input: bool,
    pub lock_on_input: bool,
    pub break_lock_input: bool,

    // ============ Countermeasures ============
    pub flare_count: u32,
    pub chaff_count: u32,
    pub flare_cooldown_active: bool,
    pub chaff_cooldown_active: bool,
    pub flare_fire_request: bool,
    pub chaff_fire_request: bool,
    pub flare_input: bool,
    pub chaff_input: bool,
    pub auto_countermeasure_enabled: bool,
    pub missile_threat_detected: bool,
    pub missile_threat_distance: f64,

    // ============ Safety ============
    pub collision_risk: f64,
    pub collision_avoidance_active: bool,
    pub avoidance_vector: [f64; 3],
}

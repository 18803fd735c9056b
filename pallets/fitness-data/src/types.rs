use codec::{Decode, Encode};
use frame_support::pallet_prelude::RuntimeDebug;
use scale_info::TypeInfo;
use sp_core::U256;
use sp_std::vec::Vec;

/// Fitness metrics stored for one account.
///
/// Every write replaces all fields except `total_workouts`, which counts the
/// writes accepted for the account. Metrics keep the full uint256 range of
/// the contract interface.
#[derive(Clone, Default, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct FitnessRecord {
	/// Display name chosen by the account owner (UTF-8, unvalidated)
	pub name: Vec<u8>,
	pub steps: U256,
	/// Distance in meters
	pub running_distance: U256,
	/// Kilocalories
	pub calories_burned: U256,
	/// Minutes
	pub workout_duration: U256,
	/// Beats per minute
	pub heart_rate_avg: U256,
	pub total_workouts: u64,
	/// Unix time in seconds of the last accepted write
	pub last_update: u64,
}

/// Values supplied by a single `set_fitness_data` call.
#[derive(Clone, Default, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct WorkoutInput {
	pub steps: U256,
	pub running_distance: U256,
	pub calories_burned: U256,
	pub workout_duration: U256,
	pub heart_rate_avg: U256,
	pub name: Vec<u8>,
}

impl FitnessRecord {
	/// Overwrites every field from `input`, bumping the workout counter.
	///
	/// Returns `None` when the counter would overflow; the record is left
	/// untouched in that case.
	pub fn apply(&mut self, input: WorkoutInput, now: u64) -> Option<()> {
		let total_workouts = self.total_workouts.checked_add(1)?;

		*self = FitnessRecord {
			name: input.name,
			steps: input.steps,
			running_distance: input.running_distance,
			calories_burned: input.calories_burned,
			workout_duration: input.workout_duration,
			heart_rate_avg: input.heart_rate_avg,
			total_workouts,
			last_update: now,
		};
		Some(())
	}
}

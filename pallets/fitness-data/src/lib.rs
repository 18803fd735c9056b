//! # Fitness Data Pallet
//!
//! Keeps one [`FitnessRecord`] per account. An account creates its record with the
//! first `set_fitness_data` call and replaces it on every later call; the only
//! accumulated value is the workout counter. Records are never removed.
//!
//! Reads are public: every getter takes the account to look up and returns
//! zero-valued defaults when that account never wrote anything.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

mod types;
pub mod weights;

pub use pallet::*;
pub use types::*;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "fitness-data";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use frame_support::{pallet_prelude::*, traits::UnixTime};
	use frame_system::pallet_prelude::*;
	use sp_core::U256;
	use sp_runtime::ArithmeticError;
	use sp_std::vec::Vec;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Source of the timestamp recorded on every write
		type UnixTime: UnixTime;

		/// Interface identifier reported to clients
		#[pallet::constant]
		type ProtocolId: Get<u32>;

		type WeightInfo: WeightInfo;
	}

	/// Fitness record of each account that wrote at least once
	#[pallet::storage]
	#[pallet::getter(fn fitness_record)]
	pub type FitnessRecords<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, FitnessRecord, OptionQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// A record was created or replaced. [who, timestamp]
		FitnessDataUpdated { who: T::AccountId, timestamp: u64 },
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Store the caller's latest workout, replacing the previous values
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::set_fitness_data(name.len() as u32))]
		pub fn set_fitness_data(
			origin: OriginFor<T>,
			steps: U256,
			running_distance: U256,
			calories_burned: U256,
			workout_duration: U256,
			heart_rate_avg: U256,
			name: Vec<u8>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;

			let input = WorkoutInput {
				steps,
				running_distance,
				calories_burned,
				workout_duration,
				heart_rate_avg,
				name,
			};
			let timestamp = Self::now();

			FitnessRecords::<T>::try_mutate(&who, |maybe_record| -> DispatchResult {
				let record = maybe_record.get_or_insert_with(FitnessRecord::default);
				record.apply(input, timestamp).ok_or(ArithmeticError::Overflow)?;
				log::debug!(
					target: LOG_TARGET,
					"fitness data updated, workouts so far: {}",
					record.total_workouts
				);
				Ok(())
			})?;

			Self::deposit_event(Event::FitnessDataUpdated { who, timestamp });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Current Unix time in seconds
		fn now() -> u64 {
			T::UnixTime::now().as_secs()
		}

		pub fn has_fitness_data(who: &T::AccountId) -> bool {
			FitnessRecords::<T>::contains_key(who)
		}

		/// Full record of `who`, or the zero-valued record if there is none
		pub fn get_all_fitness_data(who: &T::AccountId) -> FitnessRecord {
			FitnessRecords::<T>::get(who).unwrap_or_default()
		}

		pub fn get_name(who: &T::AccountId) -> Vec<u8> {
			Self::get_all_fitness_data(who).name
		}

		pub fn get_steps(who: &T::AccountId) -> U256 {
			Self::get_all_fitness_data(who).steps
		}

		pub fn get_running_distance(who: &T::AccountId) -> U256 {
			Self::get_all_fitness_data(who).running_distance
		}

		pub fn get_calories_burned(who: &T::AccountId) -> U256 {
			Self::get_all_fitness_data(who).calories_burned
		}

		pub fn get_workout_duration(who: &T::AccountId) -> U256 {
			Self::get_all_fitness_data(who).workout_duration
		}

		pub fn get_heart_rate_avg(who: &T::AccountId) -> U256 {
			Self::get_all_fitness_data(who).heart_rate_avg
		}

		pub fn get_total_workouts(who: &T::AccountId) -> u64 {
			Self::get_all_fitness_data(who).total_workouts
		}

		pub fn get_last_update(who: &T::AccountId) -> u64 {
			Self::get_all_fitness_data(who).last_update
		}

		pub fn protocol_id() -> u32 {
			T::ProtocolId::get()
		}
	}
}

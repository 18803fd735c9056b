//! Benchmarking setup for pallet-fitness-data
#![cfg(feature = "runtime-benchmarks")]
use super::*;

#[allow(unused)]
use crate::Pallet as FitnessData;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;
use sp_core::U256;
use sp_std::vec;

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn set_fitness_data(n: Linear<0, 256>) -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();

		// Existing record so the benchmark covers the overwrite path.
		FitnessRecords::<T>::insert(&caller, FitnessRecord { total_workouts: 1, ..Default::default() });

		let name = vec![b'a'; n as usize];

		#[extrinsic_call]
		set_fitness_data(
			RawOrigin::Signed(caller.clone()),
			U256::from(8500u32),
			U256::from(5200u32),
			U256::from(450u32),
			U256::from(60u32),
			U256::from(140u32),
			name.clone(),
		);

		let record = FitnessRecords::<T>::get(&caller).ok_or(BenchmarkError::Stop("record missing"))?;
		assert_eq!(record.total_workouts, 2);
		assert_eq!(record.name, name);
		Ok(())
	}

	impl_benchmark_test_suite!(FitnessData, crate::mock::new_test_ext(), crate::mock::Test);
}

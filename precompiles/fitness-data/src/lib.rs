#![cfg_attr(not(feature = "std"), no_std)]
use fp_evm::PrecompileHandle;
use frame_support::dispatch::{GetDispatchInfo, PostDispatchInfo};
use pallet_evm::AddressMapping;
use pallet_fitness_data::{Call as FitnessDataCall, Pallet as FitnessData};
use precompile_utils::{prelude::*, solidity};
use sp_core::{H160, U256};
use sp_runtime::traits::Dispatchable;
use sp_std::marker::PhantomData;

#[cfg(test)]
mod mock;

/// Solidity selector of the FitnessDataUpdated log, which is the Keccak of the Log signature.
pub const SELECTOR_LOG_FITNESS_DATA_UPDATED: [u8; 32] =
    keccak256!("FitnessDataUpdated(address,uint256)");

/// A precompile exposing pallet fitness data with the FitnessDataStorage contract interface.
pub struct FitnessDataPrecompile<Runtime>(PhantomData<Runtime>);

#[precompile_utils::precompile]
#[precompile::test_concrete_types(mock::Runtime)]
impl<Runtime> FitnessDataPrecompile<Runtime>
where
    Runtime: pallet_fitness_data::Config + pallet_evm::Config + frame_system::Config,
    Runtime::RuntimeCall: Dispatchable<PostInfo = PostDispatchInfo> + GetDispatchInfo,
    <Runtime::RuntimeCall as Dispatchable>::RuntimeOrigin: From<Option<Runtime::AccountId>>,
    Runtime::RuntimeCall: From<FitnessDataCall<Runtime>>,
    <Runtime as pallet_evm::Config>::AddressMapping: AddressMapping<Runtime::AccountId>,
{
    /// Store the caller's workout. Emits FitnessDataUpdated(caller, timestamp).
    #[precompile::public("setFitnessData(uint256,uint256,uint256,uint256,uint256,string)")]
    fn set_fitness_data(
        handle: &mut impl PrecompileHandle,
        steps: U256,
        running_distance: U256,
        calories_burned: U256,
        workout_duration: U256,
        heart_rate_avg: U256,
        name: UnboundedString,
    ) -> EvmResult {
        handle.record_log_costs_manual(2, 32)?;

        let caller = handle.context().caller;
        let who = Runtime::AddressMapping::into_account_id(caller);

        let call = FitnessDataCall::<Runtime>::set_fitness_data {
            steps,
            running_distance,
            calories_burned,
            workout_duration,
            heart_rate_avg,
            name: name.into(),
        };

        RuntimeHelper::<Runtime>::try_dispatch(handle, Some(who.clone()).into(), call)?;

        let timestamp = FitnessData::<Runtime>::get_last_update(&who);
        log2(
            handle.context().address,
            SELECTOR_LOG_FITNESS_DATA_UPDATED,
            caller,
            solidity::encode_event_data(U256::from(timestamp)),
        )
        .record(handle)?;

        Ok(())
    }

    #[precompile::public("getName(address)")]
    #[precompile::view]
    fn get_name(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<UnboundedString> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_name(&who).into())
    }

    #[precompile::public("getSteps(address)")]
    #[precompile::view]
    fn get_steps(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_steps(&who))
    }

    #[precompile::public("getRunningDistance(address)")]
    #[precompile::view]
    fn get_running_distance(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_running_distance(&who))
    }

    #[precompile::public("getCaloriesBurned(address)")]
    #[precompile::view]
    fn get_calories_burned(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_calories_burned(&who))
    }

    #[precompile::public("getWorkoutDuration(address)")]
    #[precompile::view]
    fn get_workout_duration(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_workout_duration(&who))
    }

    #[precompile::public("getHeartRateAvg(address)")]
    #[precompile::view]
    fn get_heart_rate_avg(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_heart_rate_avg(&who))
    }

    #[precompile::public("getTotalWorkouts(address)")]
    #[precompile::view]
    fn get_total_workouts(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_total_workouts(&who).into())
    }

    #[precompile::public("getLastUpdate(address)")]
    #[precompile::view]
    fn get_last_update(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<U256> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::get_last_update(&who).into())
    }

    // Fields in the order of the FitnessDataStorage ABI:
    // name, steps, runningDistance, caloriesBurned, workoutDuration,
    // heartRateAvg, totalWorkouts, lastUpdate
    #[precompile::public("getAllFitnessData(address)")]
    #[precompile::view]
    fn get_all_fitness_data(
        handle: &mut impl PrecompileHandle,
        account: Address,
    ) -> EvmResult<(UnboundedString, U256, U256, U256, U256, U256, U256, U256)> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        let record = FitnessData::<Runtime>::get_all_fitness_data(&who);

        Ok((
            record.name.into(),
            record.steps,
            record.running_distance,
            record.calories_burned,
            record.workout_duration,
            record.heart_rate_avg,
            record.total_workouts.into(),
            record.last_update.into(),
        ))
    }

    #[precompile::public("hasFitnessData(address)")]
    #[precompile::view]
    fn has_fitness_data(handle: &mut impl PrecompileHandle, account: Address) -> EvmResult<bool> {
        handle.record_cost(RuntimeHelper::<Runtime>::db_read_gas_cost())?;
        let who = account_id::<Runtime>(account);
        Ok(FitnessData::<Runtime>::has_fitness_data(&who))
    }

    #[precompile::public("protocolId()")]
    #[precompile::view]
    fn protocol_id(_handle: &mut impl PrecompileHandle) -> EvmResult<U256> {
        Ok(FitnessData::<Runtime>::protocol_id().into())
    }
}

fn account_id<Runtime>(address: Address) -> Runtime::AccountId
where
    Runtime: pallet_evm::Config + frame_system::Config,
    <Runtime as pallet_evm::Config>::AddressMapping: AddressMapping<Runtime::AccountId>,
{
    let owner: H160 = address.into();
    Runtime::AddressMapping::into_account_id(owner)
}

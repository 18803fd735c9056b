#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_fitness_data.
pub trait WeightInfo {
    fn set_fitness_data(n: u32) -> Weight;
}

/// Default weights for pallet_fitness_data
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// The range of component `n` is `[0, 256]`.
    fn set_fitness_data(n: u32) -> Weight {
        Weight::from_parts(12_000, 0)
            .saturating_add(Weight::from_parts(1_200, 0).saturating_mul(n.into()))
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn set_fitness_data(n: u32) -> Weight {
        Weight::from_parts(12_000, 0)
            .saturating_add(Weight::from_parts(1_200, 0).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads(1))
            .saturating_add(RocksDbWeight::get().writes(1))
    }
}

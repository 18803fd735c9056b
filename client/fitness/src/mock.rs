use crate::{
    abi::FitnessAbi,
    error::ClientError,
    networks::LOCALHOST_CHAIN_ID,
    transport::{parse_address, ContractTransport, ReceiptLog, TransactionReceipt, TransactionRequest},
    EXPECTED_PROTOCOL_ID,
};
use async_trait::async_trait;
use ethabi::{Address, Hash, Token, Uint};
use std::{collections::HashMap, sync::Mutex};

pub const LOCALHOST_CONTRACT: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

/// 2023-11-14T22:13:20Z
pub const GENESIS_TIME: u64 = 1_700_000_000;

pub fn alice() -> Address {
    Address::from_low_u64_be(0xa11ce)
}

pub fn bob() -> Address {
    Address::from_low_u64_be(0xb0b)
}

#[derive(Debug, Clone, Default)]
struct StoredRecord {
    name: String,
    steps: Uint,
    running_distance: Uint,
    calories_burned: Uint,
    workout_duration: Uint,
    heart_rate_avg: Uint,
    total_workouts: u64,
    last_update: u64,
}

#[derive(Default)]
struct ChainState {
    records: HashMap<Address, StoredRecord>,
    now: u64,
    block: u64,
    receipts: HashMap<Hash, TransactionReceipt>,
    pending_polls: u32,
    failing_polls: u32,
    receipt_polls: u32,
    calls: Vec<String>,
    transactions: Vec<TransactionRequest>,
    signed: Vec<String>,
    failing_read: Option<String>,
    send_error: Option<String>,
    revert_writes: bool,
    reject_signatures: bool,
}

/// In-memory chain running the store contract, playing both node and wallet.
pub struct MockChain {
    chain_id: u64,
    contract: Address,
    abi: FitnessAbi,
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            contract: parse_address(LOCALHOST_CONTRACT).unwrap(),
            abi: FitnessAbi::load().unwrap(),
            state: Mutex::new(ChainState { now: GENESIS_TIME, ..Default::default() }),
        }
    }

    pub fn localhost() -> Self {
        Self::new(LOCALHOST_CHAIN_ID)
    }

    pub fn advance_time(&self, seconds: u64) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.now += seconds;
        state.now
    }

    pub fn fail_read(&self, function: &str) {
        self.state.lock().unwrap().failing_read = Some(function.to_string());
    }

    pub fn fail_send(&self, message: &str) {
        self.state.lock().unwrap().send_error = Some(message.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.failing_read = None;
        state.send_error = None;
        state.revert_writes = false;
        state.reject_signatures = false;
    }

    pub fn revert_writes(&self) {
        self.state.lock().unwrap().revert_writes = true;
    }

    pub fn reject_signatures(&self) {
        self.state.lock().unwrap().reject_signatures = true;
    }

    /// The next `polls` receipt lookups report the transaction as pending.
    pub fn delay_receipts(&self, polls: u32) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    /// The next `polls` receipt lookups fail as if the node were unreachable.
    pub fn fail_receipts(&self, polls: u32) {
        self.state.lock().unwrap().failing_polls = polls;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn transactions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().transactions.clone()
    }

    /// Reads plus writes that reached the contract.
    pub fn contract_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.len() + state.transactions.len()
    }

    pub fn signed_messages(&self) -> Vec<String> {
        self.state.lock().unwrap().signed.clone()
    }

    pub fn receipt_polls(&self) -> u32 {
        self.state.lock().unwrap().receipt_polls
    }

    fn decode(&self, data: &[u8]) -> Result<(String, Vec<Token>), ClientError> {
        if data.len() < 4 {
            return Err(ClientError::Rpc("execution reverted".into()));
        }
        let function = self
            .abi
            .contract()
            .functions()
            .find(|f| f.short_signature()[..] == data[..4])
            .ok_or_else(|| ClientError::Rpc("execution reverted: unknown selector".into()))?;
        let args = function.decode_input(&data[4..])?;
        Ok((function.name.clone(), args))
    }

    fn write(state: &mut ChainState, who: Address, args: &[Token]) -> u64 {
        let field = |i: usize| match args.get(i) {
            Some(Token::Uint(value)) => *value,
            _ => Uint::zero(),
        };
        let name = match args.get(5) {
            Some(Token::String(name)) => name.clone(),
            _ => String::new(),
        };
        let now = state.now;
        let record = state.records.entry(who).or_default();
        *record = StoredRecord {
            name,
            steps: field(0),
            running_distance: field(1),
            calories_burned: field(2),
            workout_duration: field(3),
            heart_rate_avg: field(4),
            total_workouts: record.total_workouts + 1,
            last_update: now,
        };
        now
    }
}

fn uint(value: u64) -> Token {
    Token::Uint(value.into())
}

#[async_trait]
impl ContractTransport for MockChain {
    async fn chain_id(&self) -> Result<u64, ClientError> {
        Ok(self.chain_id)
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let (function, args) = self.decode(&data)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(function.clone());

        if to != self.contract {
            return Ok(Vec::new());
        }
        if state.failing_read.as_deref() == Some(function.as_str()) {
            return Err(ClientError::Rpc("network error: connection reset".into()));
        }

        let account = match args.first() {
            Some(Token::Address(account)) => *account,
            _ => Address::zero(),
        };
        let exists = state.records.contains_key(&account);
        let r = state.records.get(&account).cloned().unwrap_or_default();

        let output = match function.as_str() {
            "hasFitnessData" => vec![Token::Bool(exists)],
            "getName" => vec![Token::String(r.name)],
            "getSteps" => vec![Token::Uint(r.steps)],
            "getRunningDistance" => vec![Token::Uint(r.running_distance)],
            "getCaloriesBurned" => vec![Token::Uint(r.calories_burned)],
            "getWorkoutDuration" => vec![Token::Uint(r.workout_duration)],
            "getHeartRateAvg" => vec![Token::Uint(r.heart_rate_avg)],
            "getTotalWorkouts" => vec![uint(r.total_workouts)],
            "getLastUpdate" => vec![uint(r.last_update)],
            "getAllFitnessData" => vec![
                Token::String(r.name),
                Token::Uint(r.steps),
                Token::Uint(r.running_distance),
                Token::Uint(r.calories_burned),
                Token::Uint(r.workout_duration),
                Token::Uint(r.heart_rate_avg),
                uint(r.total_workouts),
                uint(r.last_update),
            ],
            "protocolId" => vec![uint(EXPECTED_PROTOCOL_ID)],
            other => return Err(ClientError::Rpc(format!("execution reverted: {other} is not a view"))),
        };
        Ok(ethabi::encode(&output))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, ClientError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.send_error.clone() {
            return Err(ClientError::Rpc(message));
        }
        state.transactions.push(tx.clone());
        state.block += 1;
        let hash = Hash::from_low_u64_be(state.transactions.len() as u64);

        let (function, args) = self.decode(&tx.data)?;
        let success = !state.revert_writes && tx.to == self.contract && function == "setFitnessData";

        let mut logs = Vec::new();
        if success {
            let timestamp = Self::write(&mut state, tx.from, &args);
            let event = self.abi.updated_event()?;
            logs.push(ReceiptLog {
                address: self.contract,
                topics: vec![event.signature(), Hash::from(tx.from)],
                data: ethabi::encode(&[uint(timestamp)]),
            });
        }

        let block_number = state.block;
        state.receipts.insert(hash, TransactionReceipt { transaction_hash: hash, block_number, success, logs });
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TransactionReceipt>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.receipt_polls += 1;
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(ClientError::Rpc("network error: could not detect network".into()));
        }
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            return Ok(None);
        }
        Ok(state.receipts.get(&hash).cloned())
    }

    async fn sign_message(&self, _signer: Address, message: &str) -> Result<Vec<u8>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.signed.push(message.to_string());
        if state.reject_signatures {
            return Err(ClientError::Rpc("User rejected the request.".into()));
        }
        Ok(vec![0x1b; 65])
    }
}

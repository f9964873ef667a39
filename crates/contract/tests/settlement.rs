//! Settling off-ledger step chains on the contract model.

use mastermind_contract::{ContractError, GameContract, LedgerContext};
use mastermind_core::{
    EngineError, GameAddress, GameConfig, GamePhase, Outcome, PublicKey, Role, Salt,
};
use zk::{HashChainProver, StepChain, StepProgram, StubSignatureScheme, StubSigner};

const GAME: GameAddress = GameAddress::new([0x31; 32]);
const SALT: Salt = Salt::new([0x62; 32]);
const SECRET: [u8; 4] = [1, 2, 3, 4];
const STAKE: u64 = 100;

struct Table {
    contract: GameContract<HashChainProver>,
    program: StepProgram<HashChainProver, StubSignatureScheme>,
    master: StubSigner,
    breaker: StubSigner,
}

impl Table {
    /// Initialized and accepted at slot 0.
    fn open() -> Self {
        let master = StubSigner::new(PublicKey([0x01; 32]));
        let breaker = StubSigner::new(PublicKey([0x02; 32]));
        let mut contract = GameContract::new(GAME, GameConfig::default(), HashChainProver);
        contract
            .initialize(&Self::ctx(&master, 0), SECRET, &SALT, STAKE)
            .unwrap();
        contract.accept(&Self::ctx(&breaker, 0), STAKE).unwrap();

        Self {
            contract,
            program: StepProgram::new(HashChainProver, StubSignatureScheme),
            master,
            breaker,
        }
    }

    fn ctx(signer: &StubSigner, slot: u32) -> LedgerContext {
        LedgerContext::new(*signer.public_key(), slot)
    }

    fn chain(&self, guesses: &[[u8; 4]]) -> StepChain {
        let root = self
            .program
            .create_step(
                SECRET,
                &SALT,
                &GAME,
                self.master.public_key(),
                &self.master.sign_for(&GAME),
            )
            .unwrap();
        let mut chain = StepChain::new(root).unwrap();
        for guess in guesses {
            self.guess(&mut chain, *guess);
            self.clue(&mut chain);
        }
        chain
    }

    fn guess(&self, chain: &mut StepChain, guess: [u8; 4]) {
        let step = self
            .program
            .guess_step(
                chain.latest(),
                guess,
                &GAME,
                self.breaker.public_key(),
                &self.breaker.sign_for(&GAME),
            )
            .unwrap();
        chain.push(step).unwrap();
    }

    fn clue(&self, chain: &mut StepChain) {
        let step = self
            .program
            .clue_step(
                chain.latest(),
                SECRET,
                &SALT,
                &GAME,
                self.master.public_key(),
                &self.master.sign_for(&GAME),
            )
            .unwrap();
        chain.push(step).unwrap();
    }
}

#[test]
fn solved_chain_settles_and_pays_the_codebreaker() {
    let mut table = Table::open();
    let chain = table.chain(&[[5, 6, 7, 1], [1, 2, 3, 4]]);
    let breaker = Table::ctx(&table.breaker, 4);

    let settlement = table
        .contract
        .submit_proof(&breaker, &chain, Some(Role::Codebreaker))
        .unwrap();
    assert_eq!(settlement.turn_count, 5);
    assert_eq!(settlement.outcome, Some(Outcome::Solved));
    assert_eq!(settlement.winner, Some(Role::Codebreaker));

    let storage = table.contract.storage();
    assert_eq!(storage.turn_word, 50_701);
    assert_eq!(storage.last_played_slot, 4);
    assert_eq!(table.contract.phase(4).unwrap(), GamePhase::Finalized);

    let master = Table::ctx(&table.master, 5);
    assert!(matches!(
        table.contract.claim_reward(&master),
        Err(ContractError::Engine(EngineError::IdentityMismatch {
            expected: Role::Codebreaker
        }))
    ));
    let claim = table
        .contract
        .claim_reward(&Table::ctx(&table.breaker, 5))
        .unwrap();
    assert_eq!(claim.recipient, Role::Codebreaker);
    assert_eq!(claim.amount, STAKE);
    assert!(matches!(
        table.contract.claim_reward(&Table::ctx(&table.breaker, 6)),
        Err(ContractError::Engine(EngineError::RewardDistributed))
    ));
}

#[test]
fn shorter_chain_is_stale() {
    let mut table = Table::open();
    let mut chain = table.chain(&[[5, 6, 7, 1]]);
    let ctx = Table::ctx(&table.breaker, 2);
    table.contract.submit_proof(&ctx, &chain, None).unwrap();
    assert_eq!(table.contract.state().unwrap().turn_count, 3);

    let replay = table.contract.submit_proof(&ctx, &chain, None);
    assert!(matches!(
        replay,
        Err(ContractError::StaleChain {
            submitted: 3,
            stored: 3
        })
    ));

    table.guess(&mut chain, [2, 1, 3, 4]);
    let settlement = table.contract.submit_proof(&ctx, &chain, None).unwrap();
    assert_eq!(settlement.turn_count, 4);
    assert_eq!(settlement.winner, None);
}

#[test]
fn wrong_claimed_winner_is_rejected_without_side_effects() {
    let mut table = Table::open();
    let chain = table.chain(&[[1, 2, 3, 4]]);
    let before = table.contract.storage().clone();

    let result = table.contract.submit_proof(
        &Table::ctx(&table.master, 1),
        &chain,
        Some(Role::Codemaster),
    );
    assert!(matches!(
        result,
        Err(ContractError::WinnerMismatch {
            claimed: Role::Codemaster,
            actual: Some(Role::Codebreaker)
        })
    ));
    assert_eq!(table.contract.storage(), &before);
}

#[test]
fn chain_from_a_stranger_does_not_settle() {
    let mut table = Table::open();
    table.breaker = StubSigner::new(PublicKey([0x03; 32]));
    let chain = table.chain(&[[5, 6, 7, 1]]);

    let result = table
        .contract
        .submit_proof(&Table::ctx(&table.master, 1), &chain, None);
    assert!(matches!(
        result,
        Err(ContractError::Engine(EngineError::IdentityMismatch {
            expected: Role::Codebreaker
        }))
    ));
}

#[test]
fn tampered_chain_is_an_invalid_proof() {
    let mut table = Table::open();
    let chain = table.chain(&[[5, 6, 7, 1], [1, 2, 3, 4]]);

    let mut json = serde_json::to_value(&chain).unwrap();
    let first = json["steps"][3]["proof"]["bytes"][0].as_u64().unwrap();
    json["steps"][3]["proof"]["bytes"][0] = serde_json::json!((first + 1) % 256);
    let tampered: StepChain = serde_json::from_value(json).unwrap();

    let result = table
        .contract
        .submit_proof(&Table::ctx(&table.master, 1), &tampered, None);
    assert!(matches!(result, Err(ContractError::InvalidProof(_))));
}

#[test]
fn on_ledger_turns_then_chain_settlement() {
    let mut table = Table::open();
    let master = Table::ctx(&table.master, 1);
    let breaker = Table::ctx(&table.breaker, 1);
    table.contract.submit_guess(&breaker, [5, 6, 7, 1]).unwrap();
    table.contract.submit_clue(&master, SECRET, &SALT).unwrap();
    assert!(matches!(
        table.contract.submit_clue(&master, SECRET, &SALT),
        Err(ContractError::Engine(EngineError::TurnSequenceViolation { .. }))
    ));

    let chain = table.chain(&[[5, 6, 7, 1], [2, 1, 3, 4]]);
    let settlement = table.contract.submit_proof(&breaker, &chain, None).unwrap();
    assert_eq!(settlement.turn_count, 5);

    let state = table.contract.state().unwrap();
    let clues: Vec<_> = state.clues().unwrap().iter().map(|c| c.scores()).collect();
    assert_eq!(clues, vec![[0, 0, 0, 1], [1, 1, 2, 2]]);
}

#[test]
fn expired_game_rejects_settlement_and_pays_the_codemaster() {
    let mut table = Table::open();
    let chain = table.chain(&[[1, 2, 3, 4]]);
    let deadline = GameConfig::default().game_duration();

    let late = Table::ctx(&table.breaker, deadline + 1);
    assert!(matches!(
        table.contract.submit_proof(&late, &chain, None),
        Err(ContractError::Engine(EngineError::AlreadyFinalized))
    ));

    let claim = table
        .contract
        .claim_reward(&Table::ctx(&table.master, deadline + 1))
        .unwrap();
    assert_eq!(claim.recipient, Role::Codemaster);
}

use registry_ledger::{
    registration_proof, Adjudicator, AdjudicatorError, Address, CallContext, Delegation,
    InMemoryTreasury, Registration, Registry, RegistryError, RegistryEvent, RegistryParams,
    SignedDelegation, SlashVerdict,
};
use registry_primitives::constants::{COLLATERAL_UNIT, REGISTRATION_DOMAIN};
use registry_sig::{Ed25519, SignatureScheme};
use std::sync::Arc;

const OWNER: Address = Address::repeat(0x21);
const CHALLENGER: Address = Address::repeat(0xCC);
const JUDGE: Address = Address::repeat(0xAD);
const JUDGE_DOMAIN: &[u8] = b"registry.adjudicator.preconf";
const COLLATERAL: u64 = 200_000_000;
const OPENS_AT: u64 = 7_200;

/// Returns a fixed verdict when the evidence is non-empty.
struct FixedJudge {
    domain: Vec<u8>,
    verdict: SlashVerdict,
}

impl Adjudicator<Ed25519> for FixedJudge {
    fn domain_separator(&self) -> Vec<u8> {
        self.domain.clone()
    }

    fn slash(
        &self,
        _delegation: &Delegation<Ed25519>,
        evidence: &[u8],
    ) -> Result<SlashVerdict, AdjudicatorError> {
        if evidence.is_empty() {
            return Err(AdjudicatorError::Rejected("no evidence".into()));
        }
        Ok(self.verdict)
    }
}

struct Fixture {
    treasury: Arc<InMemoryTreasury>,
    registry: Registry<Ed25519>,
    regs: Vec<Registration<Ed25519>>,
    keys: Vec<<Ed25519 as SignatureScheme>::SecretKey>,
    root: [u8; 32],
}

fn fixture(verdict: SlashVerdict) -> Fixture {
    let treasury = Arc::new(InMemoryTreasury::new());
    let registry = Registry::new(RegistryParams::default(), treasury.clone()).unwrap();
    registry
        .attach_adjudicator(
            JUDGE,
            Arc::new(FixedJudge { domain: JUDGE_DOMAIN.to_vec(), verdict }),
        )
        .unwrap();
    let keys: Vec<_> = (1u8..=3)
        .map(|i| Ed25519::secret_key_from_seed(&[i; 32]).unwrap())
        .collect();
    let regs: Vec<_> = keys
        .iter()
        .map(|sk| Registration::<Ed25519>::sign(sk, &OWNER, 64, REGISTRATION_DOMAIN))
        .collect();
    let ctx = CallContext::new(OWNER, 0, 0).with_value(u128::from(COLLATERAL) * COLLATERAL_UNIT);
    let root = registry.register(&ctx, &regs, OWNER, 64).unwrap();
    registry.take_events();
    Fixture { treasury, registry, regs, keys, root }
}

fn delegation(f: &Fixture, index: usize, adjudicator: Address, valid_until: u64) -> SignedDelegation<Ed25519> {
    let d = Delegation {
        proposer_key: f.regs[index].public_key,
        delegate_key: Ed25519::public_key(&Ed25519::secret_key_from_seed(&[0xDE; 32]).unwrap()),
        adjudicator,
        valid_until,
        metadata: b"slot=42".to_vec(),
    };
    SignedDelegation::sign(d, &f.keys[index], JUDGE_DOMAIN).unwrap()
}

fn slash(
    f: &Fixture,
    height: u64,
    timestamp: u64,
    index: usize,
    signed: &SignedDelegation<Ed25519>,
) -> Result<SlashVerdict, RegistryError> {
    let proof = registration_proof(&f.regs, index as u64).unwrap();
    f.registry.slash_commitment(
        &CallContext::new(CHALLENGER, height, timestamp),
        &f.root,
        &f.regs[index].signature,
        &proof,
        index as u64,
        signed,
        b"equivocation",
    )
}

#[test]
fn verdict_splits_collateral() {
    let f = fixture(SlashVerdict::new(50_000_000, 10_000_000));
    let signed = delegation(&f, 1, JUDGE, 1_000);
    assert_eq!(slash(&f, OPENS_AT, 999, 1, &signed), Ok(SlashVerdict::new(50_000_000, 10_000_000)));
    assert_eq!(f.treasury.balance_of(&CHALLENGER), 60_000_000 * COLLATERAL_UNIT);
    assert_eq!(f.treasury.balance_of(&OWNER), 140_000_000 * COLLATERAL_UNIT);
    assert!(!f.registry.is_registered(&f.root));

    let events = f.registry.take_events();
    match &events[0] {
        RegistryEvent::OperatorSlashed { proposer_key, adjudicator, remainder, .. } => {
            assert_eq!(proposer_key.as_slice(), f.regs[1].public_key.as_ref());
            assert_eq!(*adjudicator, JUDGE);
            assert_eq!(*remainder, 140_000_000);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[1], RegistryEvent::OperatorDeleted { root: f.root });
}

#[test]
fn window_mirrors_fraud_window() {
    let f = fixture(SlashVerdict::new(1, 0));
    let signed = delegation(&f, 0, JUDGE, u64::MAX);
    assert_eq!(
        slash(&f, OPENS_AT - 1, 0, 0, &signed),
        Err(RegistryError::WindowNotMet { opens_at: OPENS_AT })
    );
    assert!(slash(&f, OPENS_AT, 0, 0, &signed).is_ok());
}

#[test]
fn key_must_be_committed() {
    let f = fixture(SlashVerdict::new(1, 0));
    let signed = delegation(&f, 0, JUDGE, u64::MAX);
    // proof for index 0 presented at index 1
    let proof = registration_proof(&f.regs, 0).unwrap();
    assert_eq!(
        f.registry.slash_commitment(
            &CallContext::new(CHALLENGER, OPENS_AT, 0),
            &f.root,
            &f.regs[0].signature,
            &proof,
            1,
            &signed,
            b"x",
        ),
        Err(RegistryError::NotRegisteredKey)
    );
    // registration signature of another key
    let proof = registration_proof(&f.regs, 0).unwrap();
    assert_eq!(
        f.registry.slash_commitment(
            &CallContext::new(CHALLENGER, OPENS_AT, 0),
            &f.root,
            &f.regs[2].signature,
            &proof,
            0,
            &signed,
            b"x",
        ),
        Err(RegistryError::NotRegisteredKey)
    );
}

#[test]
fn delegation_must_be_signed_under_adjudicator_domain() {
    let f = fixture(SlashVerdict::new(1, 0));
    let mut signed = delegation(&f, 0, JUDGE, u64::MAX);
    signed.signature = Ed25519::sign(
        &signed.delegation.encode().unwrap(),
        &f.keys[0],
        REGISTRATION_DOMAIN,
    );
    assert_eq!(
        slash(&f, OPENS_AT, 0, 0, &signed),
        Err(RegistryError::DelegationSignatureInvalid)
    );
    // signed by a different committed key
    let mut forged = delegation(&f, 0, JUDGE, u64::MAX);
    forged.signature = delegation(&f, 1, JUDGE, u64::MAX).signature;
    assert_eq!(
        slash(&f, OPENS_AT, 0, 0, &forged),
        Err(RegistryError::DelegationSignatureInvalid)
    );
}

#[test]
fn unknown_adjudicator_and_expiry() {
    let f = fixture(SlashVerdict::new(1, 0));
    let stray = delegation(&f, 0, Address::repeat(0x01), u64::MAX);
    assert_eq!(
        slash(&f, OPENS_AT, 0, 0, &stray),
        Err(RegistryError::UnknownAdjudicator(Address::repeat(0x01)))
    );
    let short = delegation(&f, 0, JUDGE, 500);
    assert_eq!(
        slash(&f, OPENS_AT, 501, 0, &short),
        Err(RegistryError::DelegationExpired { valid_until: 500 })
    );
    assert!(slash(&f, OPENS_AT, 500, 0, &short).is_ok());
}

#[test]
fn verdict_bounds_enforced() {
    let zero = fixture(SlashVerdict::new(0, 5));
    let signed = delegation(&zero, 0, JUDGE, u64::MAX);
    assert_eq!(slash(&zero, OPENS_AT, 0, 0, &signed), Err(RegistryError::NoCollateralSlashed));

    let over = fixture(SlashVerdict::new(COLLATERAL, 1));
    let signed = delegation(&over, 0, JUDGE, u64::MAX);
    assert_eq!(
        slash(&over, OPENS_AT, 0, 0, &signed),
        Err(RegistryError::AmountExceedsCollateral { slash: COLLATERAL, reward: 1, collateral: COLLATERAL })
    );

    let wrap = fixture(SlashVerdict::new(u64::MAX, u64::MAX));
    let signed = delegation(&wrap, 0, JUDGE, u64::MAX);
    assert!(matches!(
        slash(&wrap, OPENS_AT, 0, 0, &signed),
        Err(RegistryError::AmountExceedsCollateral { .. })
    ));

    let exact = fixture(SlashVerdict::new(COLLATERAL - 1, 1));
    let signed = delegation(&exact, 0, JUDGE, u64::MAX);
    assert!(slash(&exact, OPENS_AT, 0, 0, &signed).is_ok());
    assert_eq!(exact.treasury.balance_of(&OWNER), 0);
    assert_eq!(exact.treasury.total_paid(), u128::from(COLLATERAL) * COLLATERAL_UNIT);

    for f in [&zero, &over, &wrap] {
        assert!(f.registry.is_registered(&f.root));
        assert_eq!(f.treasury.total_paid(), 0);
    }
}

#[test]
fn adjudicator_failure_is_slash_failure() {
    let f = fixture(SlashVerdict::new(1, 0));
    let signed = delegation(&f, 0, JUDGE, u64::MAX);
    let proof = registration_proof(&f.regs, 0).unwrap();
    assert_eq!(
        f.registry.slash_commitment(
            &CallContext::new(CHALLENGER, OPENS_AT, 0),
            &f.root,
            &f.regs[0].signature,
            &proof,
            0,
            &signed,
            b"",
        ),
        Err(RegistryError::Adjudicator(AdjudicatorError::Rejected("no evidence".into())))
    );
    assert!(f.registry.is_registered(&f.root));
}

#[test]
fn attach_rejects_registration_domain_and_duplicates() {
    let f = fixture(SlashVerdict::new(1, 0));
    let colliding = Arc::new(FixedJudge {
        domain: REGISTRATION_DOMAIN.to_vec(),
        verdict: SlashVerdict::default(),
    });
    assert_eq!(
        f.registry.attach_adjudicator(Address::repeat(0x02), colliding),
        Err(RegistryError::DomainCollision)
    );
    let again = Arc::new(FixedJudge { domain: b"registry.other".to_vec(), verdict: SlashVerdict::default() });
    assert_eq!(
        f.registry.attach_adjudicator(JUDGE, again),
        Err(RegistryError::AdjudicatorExists(JUDGE))
    );
}

#[test]
fn slashed_root_cannot_be_slashed_again() {
    let f = fixture(SlashVerdict::new(50_000_000, 0));
    let signed = delegation(&f, 0, JUDGE, u64::MAX);
    assert!(slash(&f, OPENS_AT, 0, 0, &signed).is_ok());
    let paid = f.treasury.total_paid();
    f.registry.take_events();

    let again = delegation(&f, 1, JUDGE, u64::MAX);
    assert_eq!(slash(&f, OPENS_AT + 1, 0, 1, &again), Err(RegistryError::NotRegistered));
    assert_eq!(f.treasury.total_paid(), paid);
    assert!(f.registry.take_events().is_empty());
}

#[test]
fn claimed_root_cannot_be_slashed() {
    let f = fixture(SlashVerdict::new(50_000_000, 0));
    f.registry.unregister(&CallContext::new(OWNER, 1, 0), &f.root).unwrap();
    f.registry
        .claim_collateral(&CallContext::new(OWNER, OPENS_AT + 1, 0), &f.root)
        .unwrap();
    let full = u128::from(COLLATERAL) * COLLATERAL_UNIT;
    assert_eq!(f.treasury.balance_of(&OWNER), full);
    f.registry.take_events();

    let signed = delegation(&f, 0, JUDGE, u64::MAX);
    assert_eq!(slash(&f, OPENS_AT + 2, 0, 0, &signed), Err(RegistryError::NotRegistered));
    assert_eq!(f.treasury.total_paid(), full);
    assert_eq!(f.registry.escrowed_base(), 0);
    assert!(f.registry.take_events().is_empty());
}

//! End-to-end checks of the ledger rules over both storage backends, plus
//! property tests over random operation sequences.

use learnopoly_ledger::{Ledger, LedgerError};
use learnopoly_nullables::NullStore;
use learnopoly_store::LedgerStore;
use learnopoly_store_lmdb::environment::DEFAULT_MAP_SIZE;
use learnopoly_store_lmdb::LmdbStore;
use learnopoly_types::{CourseId, Identity, PostId};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn owner() -> Identity {
    Identity::new([0xAD; 20])
}

fn user(n: u8) -> Identity {
    Identity::new([n; 20])
}

/// The scenario every backend must agree on.
fn run_scenario<S: LedgerStore>(ledger: &mut Ledger<S>) {
    let (u1, u2) = (user(1), user(2));

    ledger.create_profile(&u1, "instructor", "I teach", vec!["Teaching".into()]).unwrap();
    ledger.create_profile(&u2, "student", "I learn", vec!["Learning".into()]).unwrap();
    let err = ledger
        .create_profile(&u1, "again", "again", vec![])
        .unwrap_err();
    assert_eq!(err.to_string(), "Profile already exists");

    let course = ledger.create_course(&u1, "Blockchain 101", "Intro").unwrap();
    assert_eq!(course, CourseId::new(0));
    ledger.enroll_in_course(&u2, course).unwrap();

    let post = ledger.create_post(&u1, "Hello Learnopoly!").unwrap();
    assert_eq!(post, PostId::new(0));
    ledger.like_post(&u2, post).unwrap();

    ledger.add_connection(&u1, &u2).unwrap();
    let err = ledger.add_connection(&u1, &u1).unwrap_err();
    assert_eq!(err.to_string(), "Cannot connect with yourself");

    ledger.increase_reputation(&owner(), &u1, 10).unwrap();
}

fn assert_scenario_state<S: LedgerStore>(ledger: &Ledger<S>) {
    let (u1, u2) = (user(1), user(2));

    let instructor = ledger.profile(&u1).unwrap();
    assert_eq!(instructor.username, "instructor");
    assert_eq!(instructor.reputation, 10);

    let course = ledger.course(CourseId::new(0)).unwrap().unwrap();
    assert_eq!(course.creator, u1);
    assert_eq!(course.enrollment_count, 1);
    assert_eq!(ledger.user_enrollments(&u2).unwrap(), vec![CourseId::new(0)]);

    assert_eq!(ledger.post_count().unwrap(), 1);
    assert_eq!(ledger.post(PostId::new(0)).unwrap().unwrap().likes, 1);

    assert_eq!(ledger.user_connections(&u1).unwrap(), vec![u2]);
    assert_eq!(ledger.user_connections(&u2).unwrap(), vec![u1]);
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[test]
fn scenario_on_null_store() {
    let mut ledger = Ledger::create(NullStore::new(), owner()).unwrap();
    run_scenario(&mut ledger);
    assert_scenario_state(&ledger);
}

#[test]
fn scenario_on_lmdb_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    {
        let store = LmdbStore::open(dir.path(), DEFAULT_MAP_SIZE).expect("open");
        let mut ledger = Ledger::create(store, owner()).unwrap();
        run_scenario(&mut ledger);
        assert_scenario_state(&ledger);
    }

    let store = LmdbStore::open(dir.path(), DEFAULT_MAP_SIZE).expect("reopen");
    let ledger = Ledger::open(store).unwrap();
    assert_eq!(ledger.administrator(), &owner());
    assert_scenario_state(&ledger);
}

#[test]
fn snapshot_moves_between_backends() {
    let mut source = Ledger::create(NullStore::new(), owner()).unwrap();
    run_scenario(&mut source);
    let snapshot = source.export_snapshot().unwrap();

    let dir = tempfile::tempdir().expect("temp dir");
    let store = LmdbStore::open(dir.path(), DEFAULT_MAP_SIZE).expect("open");
    let restored = Ledger::import_snapshot(store, &snapshot).unwrap();
    assert_scenario_state(&restored);
    assert_eq!(restored.export_snapshot().unwrap().hash, snapshot.hash);
}

#[test]
fn non_administrator_reputation_is_an_authorization_failure() {
    let mut ledger = Ledger::create(NullStore::new(), owner()).unwrap();
    ledger.create_profile(&user(1), "u", "b", vec![]).unwrap();

    let err = ledger.increase_reputation(&user(2), &user(1), 1).unwrap_err();
    assert!(matches!(err, LedgerError::NotAdministrator { caller } if caller == user(2)));
    assert!(!err.is_precondition());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    CreateProfile(u8),
    UpdateProfile(u8),
    IncreaseReputation { caller: u8, target: u8, amount: u64 },
    CreateCourse(u8),
    Enroll { caller: u8, course: u64 },
    CreatePost(u8),
    Like { caller: u8, post: u64 },
    Connect(u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Callers 0..5; caller 0 is the administrator.
    let who = 0u8..5;
    prop_oneof![
        who.clone().prop_map(Op::CreateProfile),
        who.clone().prop_map(Op::UpdateProfile),
        (who.clone(), who.clone(), 0u64..100).prop_map(|(caller, target, amount)| {
            Op::IncreaseReputation { caller, target, amount }
        }),
        who.clone().prop_map(Op::CreateCourse),
        (who.clone(), 0u64..6).prop_map(|(caller, course)| Op::Enroll { caller, course }),
        who.clone().prop_map(Op::CreatePost),
        (who.clone(), 0u64..6).prop_map(|(caller, post)| Op::Like { caller, post }),
        (who.clone(), who).prop_map(|(a, b)| Op::Connect(a, b)),
    ]
}

fn identity(n: u8) -> Identity {
    if n == 0 {
        owner()
    } else {
        user(n)
    }
}

fn apply(ledger: &mut Ledger<NullStore>, op: &Op) -> Result<(), LedgerError> {
    match *op {
        Op::CreateProfile(n) => ledger.create_profile(&identity(n), "name", "bio", vec![]),
        Op::UpdateProfile(n) => ledger.update_profile(&identity(n), "renamed", "bio", vec!["x".into()]),
        Op::IncreaseReputation { caller, target, amount } => {
            ledger.increase_reputation(&identity(caller), &identity(target), amount)
        }
        Op::CreateCourse(n) => ledger.create_course(&identity(n), "t", "d").map(|_| ()),
        Op::Enroll { caller, course } => ledger.enroll_in_course(&identity(caller), CourseId::new(course)),
        Op::CreatePost(n) => ledger.create_post(&identity(n), "c").map(|_| ()),
        Op::Like { caller, post } => ledger.like_post(&identity(caller), PostId::new(post)),
        Op::Connect(a, b) => ledger.add_connection(&identity(a), &identity(b)),
    }
}

proptest! {
    /// Every invariant holds after every operation, and rejected operations
    /// leave the state byte-for-byte unchanged.
    #[test]
    fn invariants_hold_over_random_sequences(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::create(NullStore::new(), owner()).unwrap();
        let mut courses = 0u64;
        let mut posts = 0u64;

        for op in &ops {
            let before = ledger.export_snapshot().unwrap();
            let existed: Vec<bool> = (0..5u8)
                .map(|n| ledger.profile(&identity(n)).unwrap().exists)
                .collect();

            match apply(&mut ledger, op) {
                Ok(()) => match op {
                    Op::CreateCourse(_) => courses += 1,
                    Op::CreatePost(_) => posts += 1,
                    _ => {}
                },
                Err(_) => {
                    let after = ledger.export_snapshot().unwrap();
                    prop_assert_eq!(after.hash, before.hash);
                }
            }

            let snap = ledger.export_snapshot().unwrap();
            prop_assert_eq!(snap.check_invariants(), Ok(()));
            prop_assert_eq!(ledger.course_count().unwrap(), courses);
            prop_assert_eq!(ledger.post_count().unwrap(), posts);
            for n in 0..5u8 {
                if existed[n as usize] {
                    prop_assert!(ledger.profile(&identity(n)).unwrap().exists);
                }
            }
        }
    }

    /// Likes equal the number of successful like calls naming the post.
    #[test]
    fn likes_match_successful_calls(likers in prop::collection::vec(0u8..5, 0..40)) {
        let mut ledger = Ledger::create(NullStore::new(), owner()).unwrap();
        let post = ledger.create_post(&user(1), "p").unwrap();
        for n in &likers {
            ledger.like_post(&identity(*n), post).unwrap();
        }
        prop_assert_eq!(ledger.post(post).unwrap().unwrap().likes, likers.len() as u64);
    }

    /// Connection lists stay symmetric: B in A's list iff A in B's list.
    #[test]
    fn connections_are_symmetric(pairs in prop::collection::vec((1u8..6, 1u8..6), 0..30)) {
        let mut ledger = Ledger::create(NullStore::new(), owner()).unwrap();
        for (a, b) in &pairs {
            let result = ledger.add_connection(&user(*a), &user(*b));
            prop_assert_eq!(result.is_err(), a == b);
        }
        for a in 1u8..6 {
            for b in ledger.user_connections(&user(a)).unwrap() {
                prop_assert!(ledger.user_connections(&b).unwrap().contains(&user(a)));
            }
        }
    }
}

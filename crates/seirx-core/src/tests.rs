//! Unit tests for seirx-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod group {
    use crate::AgentType;

    #[test]
    fn names_are_snake_case() {
        assert_eq!(AgentType::Resident.as_str(), "resident");
        assert_eq!(AgentType::FamilyMember.as_str(), "family_member");
    }

    #[test]
    fn all_is_exhaustive_and_ordered() {
        assert_eq!(AgentType::ALL.len(), 5);
        for pair in AgentType::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{Day, SimClock, Weekday};

    #[test]
    fn day_arithmetic() {
        let d = Day(10);
        assert_eq!(d + 5, Day(15));
        assert_eq!(d.offset(3), Day(13));
        assert_eq!(Day(15) - Day(10), 5u64);
    }

    #[test]
    fn weekday_cycles() {
        assert_eq!(Weekday::from_index(0), Weekday::Monday);
        assert_eq!(Weekday::from_index(6), Weekday::Sunday);
        assert_eq!(Weekday::from_index(7), Weekday::Monday);
    }

    #[test]
    fn clock_advances_weekday() {
        let mut clock = SimClock::new(0);
        assert_eq!(clock.weekday(), Weekday::Monday);
        clock.advance();
        assert_eq!(clock.current_day, Day(1));
        assert_eq!(clock.weekday(), Weekday::Tuesday);
        for _ in 0..6 {
            clock.advance();
        }
        assert_eq!(clock.weekday(), Weekday::Monday);
    }

    #[test]
    fn offset_shifts_day_zero() {
        let clock = SimClock::new(3);
        assert_eq!(clock.weekday(), Weekday::Thursday);
        // Offsets wrap modulo 7.
        assert_eq!(SimClock::new(7).weekday(), Weekday::Monday);
    }

    #[test]
    fn weekday_of_arbitrary_day() {
        let clock = SimClock::new(0);
        assert_eq!(clock.weekday_of(Day(14)), Weekday::Monday);
        assert_eq!(clock.weekday_of(Day(18)), Weekday::Friday);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f64..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = AgentRng::new(0, AgentId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn sim_rng_children_diverge() {
        let mut root = SimRng::new(9);
        let mut c1 = root.child(1);
        let mut c2 = root.child(2);
        let a: u64 = c1.random();
        let b: u64 = c2.random();
        assert_ne!(a, b);
    }
}

#[cfg(all(test, feature = "serde"))]
mod rng_serde {
    use crate::{AgentId, AgentRng};

    #[test]
    fn rng_state_survives_roundtrip() {
        let mut rng = AgentRng::new(7, AgentId(3));
        let _burn: u64 = rng.random();

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: AgentRng = serde_json::from_str(&json).unwrap();

        for _ in 0..10 {
            let a: u64 = rng.random();
            let b: u64 = restored.random();
            assert_eq!(a, b);
        }
    }
}

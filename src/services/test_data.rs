//! Random participants for rehearsals and demos.

use rand::Rng;

use crate::dao::models::{Category, NewParticipant, ParticipantStatus};

const SCHOOLS: [&str; 5] = [
    "High School A",
    "High School B",
    "High School C",
    "Middle School X",
    "Middle School Y",
];
const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Michael", "Sarah", "David", "Emma", "James", "Olivia", "William", "Sophia",
];
const LAST_NAMES: [&str; 10] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
];

/// Build `count` registered participants.
///
/// Team numbers run from `0001` upwards and team names cycle through
/// `Team A1` … `Team Z1`, `Team A2` … The category follows the drawn grade.
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<NewParticipant> {
    (0..count).map(|index| participant(index, rng)).collect()
}

fn participant<R: Rng + ?Sized>(index: usize, rng: &mut R) -> NewParticipant {
    let grade = rng.random_range(5..=8);
    let hour = rng.random_range(8..=11);
    let minute = rng.random_range(0..60);

    NewParticipant {
        team_number: format!("{:04}", index + 1),
        team_name: team_name(index),
        first_name: pick(&FIRST_NAMES, rng),
        last_name: pick(&LAST_NAMES, rng),
        grade,
        school_name: pick(&SCHOOLS, rng),
        category: Category::from_grade(grade),
        arrival_time: format!("{hour:02}:{minute:02}"),
        status: ParticipantStatus::Registered,
    }
}

fn team_name(index: usize) -> String {
    // index % 26 < 26, so the letter stays within A..=Z.
    let letter = char::from(b'A' + (index % 26) as u8);
    format!("Team {letter}{}", index / 26 + 1)
}

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool[rng.random_range(0..pool.len())].to_string()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn generates_numbered_registered_teams() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate(53, &mut rng);

        assert_eq!(records.len(), 53);
        assert_eq!(records[0].team_number, "0001");
        assert_eq!(records[0].team_name, "Team A1");
        assert_eq!(records[25].team_name, "Team Z1");
        assert_eq!(records[26].team_name, "Team A2");
        assert_eq!(records[52].team_number, "0053");
        assert_eq!(records[52].team_name, "Team A3");
        assert!(
            records
                .iter()
                .all(|r| r.status == ParticipantStatus::Registered)
        );
    }

    #[test]
    fn fields_stay_within_their_pools() {
        let mut rng = StdRng::seed_from_u64(42);
        for record in generate(200, &mut rng) {
            assert!((5..=8).contains(&record.grade));
            assert_eq!(record.category, Category::from_grade(record.grade));
            assert!(SCHOOLS.contains(&record.school_name.as_str()));
            assert!(FIRST_NAMES.contains(&record.first_name.as_str()));
            assert!(LAST_NAMES.contains(&record.last_name.as_str()));

            let (hour, minute) = record.arrival_time.split_once(':').unwrap();
            assert_eq!(hour.len(), 2);
            assert_eq!(minute.len(), 2);
            assert!((8..=11).contains(&hour.parse::<u32>().unwrap()));
            assert!(minute.parse::<u32>().unwrap() < 60);
        }
    }

    #[test]
    fn same_seed_same_records() {
        let first = generate(10, &mut StdRng::seed_from_u64(1));
        let second = generate(10, &mut StdRng::seed_from_u64(1));
        assert_eq!(first, second);
    }
}

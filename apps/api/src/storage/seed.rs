//! Deterministic mock candidate population used to bootstrap empty stores.

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use crate::models::candidate::{Candidate, Education, Location};

const ROLES: &[&str] = &[
    "Software Engineer",
    "Data Analyst",
    "Product Manager",
    "UX Designer",
    "HR Specialist",
    "Frontend Developer",
    "Backend Developer",
    "DevOps Engineer",
    "Marketing Manager",
    "Sales Representative",
    "Project Manager",
    "Business Analyst",
    "QA Engineer",
    "Technical Writer",
    "Security Engineer",
    "Systems Administrator",
    "Database Administrator",
    "Data Scientist",
    "Machine Learning Engineer",
    "Mobile Developer",
];

const SKILLS: &[&str] = &[
    "JavaScript", "React", "Node.js", "Python", "Java", "SQL", "MongoDB",
    "GraphQL", "Docker", "AWS", "Azure", "Git", "TypeScript", "Vue.js",
    "Angular", "C#", "PHP", "Ruby", "Swift", "Kotlin", "Go",
    "Data Analysis", "Machine Learning", "Project Management", "Leadership",
    "Communication", "Problem Solving", "Customer Service", "Agile",
    "Scrum", "UI/UX Design", "Figma", "Adobe XD", "Sketch",
    "Marketing", "Sales", "Content Creation", "SEO", "Social Media",
    "Public Speaking", "Negotiation", "Strategic Planning", "Budgeting",
    "Team Management", "Recruitment", "Training",
];

/// (city, country, latitude, longitude)
const CITIES: &[(&str, &str, f64, f64)] = &[
    ("New York", "USA", 40.7128, -74.0060),
    ("San Francisco", "USA", 37.7749, -122.4194),
    ("Seattle", "USA", 47.6062, -122.3321),
    ("Boston", "USA", 42.3601, -71.0589),
    ("Austin", "USA", 30.2672, -97.7431),
    ("Chicago", "USA", 41.8781, -87.6298),
    ("Los Angeles", "USA", 34.0522, -118.2437),
    ("London", "UK", 51.5074, -0.1278),
    ("Berlin", "Germany", 52.5200, 13.4050),
    ("Paris", "France", 48.8566, 2.3522),
    ("Tokyo", "Japan", 35.6762, 139.6503),
    ("Sydney", "Australia", -33.8688, 151.2093),
    ("Toronto", "Canada", 43.6532, -79.3832),
    ("Singapore", "Singapore", 1.3521, 103.8198),
    ("Bangalore", "India", 12.9716, 77.5946),
    ("Dublin", "Ireland", 53.3498, -6.2603),
    ("Amsterdam", "Netherlands", 52.3676, 4.9041),
    ("Stockholm", "Sweden", 59.3293, 18.0686),
    ("Zurich", "Switzerland", 47.3769, 8.5417),
    ("Dubai", "UAE", 25.2048, 55.2708),
];

/// (institution, city, country, latitude, longitude)
const UNIVERSITIES: &[(&str, &str, &str, f64, f64)] = &[
    ("Stanford University", "Stanford", "USA", 37.4275, -122.1697),
    ("MIT", "Cambridge", "USA", 42.3601, -71.0942),
    ("Harvard University", "Cambridge", "USA", 42.3770, -71.1167),
    ("University of California, Berkeley", "Berkeley", "USA", 37.8719, -122.2585),
    ("University of Washington", "Seattle", "USA", 47.6553, -122.3035),
    ("Carnegie Mellon University", "Pittsburgh", "USA", 40.4432, -79.9428),
    ("University of Michigan", "Ann Arbor", "USA", 42.2808, -83.7430),
    ("University of Texas", "Austin", "USA", 30.2849, -97.7341),
    ("Georgia Tech", "Atlanta", "USA", 33.7756, -84.3963),
    ("Oxford University", "Oxford", "UK", 51.7520, -1.2577),
    ("Cambridge University", "Cambridge", "UK", 52.2054, 0.1132),
    ("Imperial College London", "London", "UK", 51.4988, -0.1749),
    ("ETH Zurich", "Zurich", "Switzerland", 47.3763, 8.5487),
    ("University of Toronto", "Toronto", "Canada", 43.6629, -79.3957),
    ("National University of Singapore", "Singapore", "Singapore", 1.2966, 103.7764),
    ("Tsinghua University", "Beijing", "China", 40.0000, 116.3264),
    ("University of Tokyo", "Tokyo", "Japan", 35.7128, 139.7621),
    ("Technical University of Munich", "Munich", "Germany", 48.1496, 11.5678),
    ("University of Melbourne", "Melbourne", "Australia", -37.7981, 144.9600),
    ("Indian Institute of Technology", "Delhi", "India", 28.5456, 77.1926),
];

const DEGREES: &[&str] = &[
    "Bachelor of Science in Computer Science",
    "Bachelor of Arts in Economics",
    "Bachelor of Science in Data Science",
    "Bachelor of Science in Business Administration",
    "Bachelor of Arts in Communications",
    "Bachelor of Science in Engineering",
    "Master of Science in Computer Science",
    "Master of Business Administration",
    "Master of Science in Data Analytics",
    "Master of Arts in Design",
    "Ph.D in Computer Science",
    "Associate Degree in Information Technology",
];

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Emily", "David", "Sarah", "James", "Emma", "Robert", "Olivia",
    "William", "Sophia", "Joseph", "Isabella", "Thomas", "Mia", "Daniel", "Charlotte", "Matthew",
    "Amelia",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin",
];

/// Builds `count` candidates with ids `1..=count`. The same seed always
/// yields the same population.
pub fn generate_mock_candidates(count: usize, seed: u64) -> Vec<Candidate> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count)
        .map(|n| mock_candidate(&mut rng, n as i32))
        .collect()
}

fn mock_candidate(rng: &mut StdRng, id: i32) -> Candidate {
    let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
    let role = pick(rng, ROLES).to_string();

    let &(city, country, latitude, longitude) = pick(rng, CITIES);
    let current_location = Location {
        latitude,
        longitude,
        city: city.to_string(),
        country: country.to_string(),
    };

    let skill_count = rng.random_range(2..=5);
    let skills = index::sample(rng, SKILLS.len(), skill_count)
        .into_iter()
        .map(|i| SKILLS[i].to_string())
        .collect();

    // each school at most once per candidate
    let education_count = rng.random_range(1..=3);
    let education = index::sample(rng, UNIVERSITIES.len(), education_count)
        .into_iter()
        .map(|i| {
            let (institution, city, country, latitude, longitude) = UNIVERSITIES[i];
            Education {
                institution_name: institution.to_string(),
                degree: pick(rng, DEGREES).to_string(),
                graduation_year: rng.random_range(2000..=2023),
                location: Location {
                    latitude,
                    longitude,
                    city: city.to_string(),
                    country: country.to_string(),
                },
            }
        })
        .collect();

    Candidate {
        id,
        name,
        current_location,
        education,
        skills,
        role,
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

// Profession distribution prompt templates.

pub const DISTRIBUTION_PROMPT_TEMPLATE: &str = r#"Generate synthetic but plausible data about the geographic distribution in Italy of a specific professional role.

Given a job title (e.g. "Software Developer", "Nurse", "Architect"), return a JSON array of objects, each representing an Italian locality, as precise as possible and consistent with the professional context.

Each object must have exactly two fields:
- "place": the locality name, lowercase and without accents (e.g. "napoli")
- "distribution": a decimal number greater than 0 and at most 1, the share of professionals located there. The "distribution" values of the whole array must sum to exactly 1.

Return a reasonable number of localities, at least 10, reflecting how the profession is realistically distributed (e.g. for "University Researcher" focus on university cities).
Every place must be a real Italian city; never use groupings such as "other cities". Each place must appear only once.

Return only the JSON array, with no further explanation or text.

JOB TITLE:
{profession}"#;

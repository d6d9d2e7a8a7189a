use std::sync::Arc;

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick from `(label, weight)` pairs proportionally to weight.
    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut r = self.next_f64() * total;
        for &(label, weight) in items {
            if r < weight {
                return label;
            }
            r -= weight;
        }
        items[items.len() - 1].0
    }
}

const SKILLS: [&str; 8] = [
    "Python",
    "SQL",
    "Java",
    "Agile",
    "AWS",
    "Excel",
    "Communication",
    "Leadership",
];

/// How likely a posting for this designation is to list a skill.
fn skill_probability(designation: &str, skill: &str) -> f64 {
    let biases: &[(&str, f64)] = match designation {
        "Project Manager" => &[
            ("Agile", 0.85),
            ("Communication", 0.75),
            ("Leadership", 0.7),
            ("Excel", 0.5),
        ],
        "Team Lead" => &[
            ("Java", 0.7),
            ("Leadership", 0.65),
            ("Agile", 0.6),
            ("SQL", 0.5),
        ],
        "Associate Tech Specialist" => &[
            ("Python", 0.7),
            ("SQL", 0.65),
            ("AWS", 0.5),
            ("Excel", 0.4),
        ],
        "Software Engineer" => &[
            ("Python", 0.6),
            ("Java", 0.55),
            ("SQL", 0.5),
            ("AWS", 0.35),
        ],
        "Data Analyst" => &[("SQL", 0.8), ("Python", 0.7), ("Excel", 0.7)],
        "DevOps Engineer" => &[("AWS", 0.85), ("Python", 0.5)],
        _ => &[],
    };
    biases
        .iter()
        .find(|(name, _)| *name == skill)
        .map(|(_, p)| *p)
        .unwrap_or(0.18)
}

struct Posting {
    job_id: i64,
    company: String,
    designation: String,
    location: String,
    industry: String,
    work_type: String,
    involvement: String,
    employees: i64,
    /// Left blank in a small fraction of rows.
    followers: Option<i64>,
    applicants: i64,
    skills: [i64; SKILLS.len()],
}

fn generate_posting(rng: &mut SimpleRng, job_id: i64) -> Posting {
    let company = rng.weighted(&[
        ("TechMahindra", 9.0),
        ("Infosys", 8.0),
        ("Wipro", 7.0),
        ("Accenture", 6.0),
        ("Cognizant", 5.0),
        ("TCS", 5.0),
        ("Capgemini", 4.0),
        ("HCL", 3.0),
        ("IBM", 3.0),
        ("Deloitte", 2.0),
        ("Mindtree", 1.0),
        ("Zoho", 1.0),
    ]);
    let designation = rng.weighted(&[
        ("Software Engineer", 8.0),
        ("Team Lead", 6.0),
        ("Project Manager", 5.0),
        ("Associate Tech Specialist", 4.0),
        ("Data Analyst", 3.0),
        ("DevOps Engineer", 2.0),
    ]);
    let location = rng.weighted(&[
        ("Bangalore", 8.0),
        ("Pune", 7.0),
        ("Hyderabad", 6.0),
        ("Mumbai", 5.0),
        ("Delhi", 4.0),
        ("Chennai", 3.0),
        ("Noida", 2.0),
    ]);
    let industry = rng.weighted(&[
        ("Information Technology", 9.0),
        ("Consulting", 5.0),
        ("Financial Services", 4.0),
        ("Healthcare", 2.0),
        ("E-commerce", 2.0),
    ]);
    let work_type = rng.weighted(&[("On-site", 5.0), ("Hybrid", 3.0), ("Remote", 2.0)]);
    let involvement = rng.weighted(&[("Full-time", 9.0), ("Contract", 1.0)]);

    let employees = rng.gauss(2000.0, 800.0).max(50.0) as i64;
    let followers_value = rng.gauss(9.0, 0.8).exp() as i64;
    // Applicants track followers, with noise.
    let applicants = (followers_value as f64 / 120.0 + rng.gauss(0.0, 15.0)).max(0.0) as i64;
    let followers = (rng.next_f64() >= 0.03).then_some(followers_value);

    let mut skills = [0i64; SKILLS.len()];
    for (slot, skill) in skills.iter_mut().zip(SKILLS) {
        if rng.next_f64() < skill_probability(designation, skill) {
            *slot = 1;
        }
    }

    Posting {
        job_id,
        company: company.to_string(),
        designation: designation.to_string(),
        location: location.to_string(),
        industry: industry.to_string(),
        work_type: work_type.to_string(),
        involvement: involvement.to_string(),
        employees,
        followers,
        applicants,
        skills,
    }
}

/// Raw header names carry spaces on purpose: the loader's normalization is
/// part of what the sample exercises.
const META_COLUMNS: [&str; 10] = [
    "Job ID",
    "Company Name",
    "Designation",
    "Location",
    "Industry",
    "Work Type",
    "Involvement",
    "Employees count",
    "LinkedIn Followers",
    "Total applicants",
];

fn write_csv(postings: &[Posting], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");

    let header: Vec<&str> = META_COLUMNS.iter().chain(SKILLS.iter()).copied().collect();
    writer.write_record(&header).expect("Failed to write header");

    for p in postings {
        let mut record = vec![
            p.job_id.to_string(),
            p.company.clone(),
            p.designation.clone(),
            p.location.clone(),
            p.industry.clone(),
            p.work_type.clone(),
            p.involvement.clone(),
            p.employees.to_string(),
            p.followers.map(|f| f.to_string()).unwrap_or_default(),
            p.applicants.to_string(),
        ];
        record.extend(p.skills.iter().map(|s| s.to_string()));
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(postings: &[Posting], path: &str) {
    let mut fields: Vec<Field> = vec![
        Field::new("Job ID", DataType::Int64, false),
        Field::new("Company Name", DataType::Utf8, false),
        Field::new("Designation", DataType::Utf8, false),
        Field::new("Location", DataType::Utf8, false),
        Field::new("Industry", DataType::Utf8, false),
        Field::new("Work Type", DataType::Utf8, false),
        Field::new("Involvement", DataType::Utf8, false),
        Field::new("Employees count", DataType::Int64, false),
        Field::new("LinkedIn Followers", DataType::Int64, true),
        Field::new("Total applicants", DataType::Int64, false),
    ];
    for skill in SKILLS {
        fields.push(Field::new(skill, DataType::Int64, false));
    }
    let schema = Arc::new(Schema::new(fields));

    let strings = |f: fn(&Posting) -> &str| {
        StringArray::from(postings.iter().map(f).collect::<Vec<_>>())
    };
    let mut arrays: Vec<Arc<dyn Array>> = vec![
        Arc::new(Int64Array::from(
            postings.iter().map(|p| p.job_id).collect::<Vec<_>>(),
        )),
        Arc::new(strings(|p| p.company.as_str())),
        Arc::new(strings(|p| p.designation.as_str())),
        Arc::new(strings(|p| p.location.as_str())),
        Arc::new(strings(|p| p.industry.as_str())),
        Arc::new(strings(|p| p.work_type.as_str())),
        Arc::new(strings(|p| p.involvement.as_str())),
        Arc::new(Int64Array::from(
            postings.iter().map(|p| p.employees).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            postings.iter().map(|p| p.followers).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            postings.iter().map(|p| p.applicants).collect::<Vec<_>>(),
        )),
    ];
    for i in 0..SKILLS.len() {
        arrays.push(Arc::new(Int64Array::from(
            postings.iter().map(|p| p.skills[i]).collect::<Vec<_>>(),
        )));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let postings: Vec<Posting> = (0..240)
        .map(|i| generate_posting(&mut rng, 1000 + i))
        .collect();

    write_csv(&postings, "sample_jobs.csv");
    write_parquet(&postings, "sample_jobs.parquet");

    println!(
        "Wrote {} postings ({} columns) to sample_jobs.csv and sample_jobs.parquet",
        postings.len(),
        META_COLUMNS.len() + SKILLS.len(),
    );
}

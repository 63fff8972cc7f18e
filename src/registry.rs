/// One entry in the fixed measurement schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub max: u32,
}

impl FieldSpec {
    /// Human-readable label: `"teacher_student_relationship"` becomes
    /// `"Teacher Student Relationship"`.
    pub fn label(&self) -> String {
        self.name
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The 20 recognized measurement fields, in display order. Every value is an
/// integer in `[0, max]`. Loaded once; never mutated.
pub const FIELDS: [FieldSpec; 20] = [
    FieldSpec { name: "anxiety_level", max: 21 },
    FieldSpec { name: "self_esteem", max: 30 },
    FieldSpec { name: "mental_health_history", max: 1 },
    FieldSpec { name: "depression", max: 27 },
    FieldSpec { name: "headache", max: 5 },
    FieldSpec { name: "blood_pressure", max: 3 },
    FieldSpec { name: "sleep_quality", max: 5 },
    FieldSpec { name: "breathing_problem", max: 5 },
    FieldSpec { name: "noise_level", max: 5 },
    FieldSpec { name: "living_conditions", max: 5 },
    FieldSpec { name: "safety", max: 5 },
    FieldSpec { name: "basic_needs", max: 5 },
    FieldSpec { name: "academic_performance", max: 5 },
    FieldSpec { name: "study_load", max: 5 },
    FieldSpec { name: "teacher_student_relationship", max: 5 },
    FieldSpec { name: "future_career_concerns", max: 5 },
    FieldSpec { name: "social_support", max: 3 },
    FieldSpec { name: "peer_pressure", max: 5 },
    FieldSpec { name: "extracurricular_activities", max: 5 },
    FieldSpec { name: "bullying", max: 5 },
];

/// Maximum allowed value for a field, or `None` for an unrecognized name.
pub fn max_of(name: &str) -> Option<u32> {
    FIELDS.iter().find(|f| f.name == name).map(|f| f.max)
}

/// All registered field names in display order.
pub fn all_field_names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.name)
}

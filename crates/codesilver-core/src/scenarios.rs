//! Example clinical notes used for demos and regression checks.

/// A named example note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    pub text: &'static str,
}

pub static EXAMPLE_SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "COPD Exacerbation",
        text: "Mr. Jones has worsening COPD exacerbation, not responding to nebulizers.
Starting prednisone 60mg, observe for 24 hours, if no improvement we may need to admit.
Patient currently on 2L O2, respiratory rate 24.",
    },
    Scenario {
        name: "CHF Decompensation",
        text: "Mrs. Smith presents with acute decompensated CHF, bilateral lower extremity edema,
JVD noted. Starting IV Lasix 40mg, will admit for telemetry monitoring and diuresis.
Expect 3-4 day stay. Patient has history of diabetes and hypertension.",
    },
    Scenario {
        name: "Pneumonia Admission",
        text: "Patient presents with severe pneumonia, O2 sat 88% on room air,
respiratory rate 28. CXR shows bilateral infiltrates. Starting IV antibiotics,
will need inpatient admission for at least 48-72 hours. Patient also has CKD stage 3.",
    },
];

/// Look up a scenario by name (case-insensitive).
pub fn scenario(name: &str) -> Option<&'static Scenario> {
    EXAMPLE_SCENARIOS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

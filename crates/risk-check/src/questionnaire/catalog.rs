use super::domain::{
    CounterPrompt, Dependent, InputField, InputKind, Question, QuestionKind, QuestionOption,
    Visibility,
};

/// Question, option, and field identifiers shared with profile extraction.
pub mod ids {
    pub const FAMILY: &str = "family";
    pub const DEPENDENTS: &str = "dependents";
    pub const AGES: &str = "ages";
    pub const CONDITIONS: &str = "conditions";
    pub const INCOME: &str = "income";
    pub const DEBT: &str = "debt";
    pub const SAVINGS: &str = "savings";
    pub const HEALTH_INSURANCE: &str = "health_insurance";
    pub const HEALTH_COVER: &str = "health_cover";
    pub const LIFE_INSURANCE: &str = "life_insurance";
    pub const LIFE_COVER: &str = "life_cover";
    pub const CITY: &str = "city";

    pub const SPOUSE: &str = "spouse";
    pub const CHILDREN: &str = "children";
    pub const PARENTS: &str = "parents";
    pub const CHILDREN_COUNT: &str = "children_count";
    pub const PARENTS_COUNT: &str = "parents_count";

    pub const SELF_AGE: &str = "self";
    pub const SPOUSE_AGE: &str = "spouse";
    pub const CHILD_AGES: [&str; 6] = [
        "child_1", "child_2", "child_3", "child_4", "child_5", "child_6",
    ];
    pub const PARENT_AGES: [&str; 4] = ["parent_1", "parent_2", "parent_3", "parent_4"];

    pub const NO_CONDITIONS: &str = "none";
    pub const YES: &str = "yes";
    pub const NO: &str = "no";

    pub const MONTHLY_LAKHS: &str = "monthly_lakhs";
    pub const OUTSTANDING_LAKHS: &str = "outstanding_lakhs";
    pub const LIQUID_LAKHS: &str = "liquid_lakhs";
    pub const COVER_LAKHS: &str = "cover_lakhs";
    pub const CITY_NAME: &str = "name";
}

pub const MAX_CHILDREN: u8 = 6;
pub const MAX_PARENTS: u8 = 4;

pub(crate) fn standard_questions() -> Vec<Question> {
    vec![
        family(),
        dependents(),
        ages(),
        conditions(),
        amount(
            ids::INCOME,
            "Total household monthly income?",
            "Combined income of all earning members.",
            "Your income determines what your family would need to maintain their lifestyle. Life cover = ~10–15× annual income.",
            ids::MONTHLY_LAKHS,
            "Monthly income (₹ lakh)",
            0.0,
            60.0,
        ),
        amount(
            ids::DEBT,
            "How much do you owe in total?",
            "Home loan, car loan, personal loans, and credit card balances.",
            "Outstanding debt passes to your family if something happens to you. Life cover must be enough to clear debts AND replace income.",
            ids::OUTSTANDING_LAKHS,
            "Outstanding debt (₹ lakh)",
            0.0,
            200.0,
        ),
        amount(
            ids::SAVINGS,
            "How much could you access in an emergency?",
            "Savings, FDs, and liquid investments you can withdraw within a week.",
            "Your savings act as a buffer. If savings can cover a hospitalisation, your insurance gap is smaller. If not, it's a real risk.",
            ids::LIQUID_LAKHS,
            "Liquid savings (₹ lakh)",
            0.0,
            100.0,
        ),
        insurance(
            ids::HEALTH_INSURANCE,
            "Do you have health insurance?",
            "Most families are underinsured. A single surgery can cost ₹4–10L; your cover needs to keep pace with actual costs.",
            cover(ids::HEALTH_COVER, "What is your total health cover?", 1.0, 100.0),
        ),
        insurance(
            ids::LIFE_INSURANCE,
            "Do you have life insurance?",
            "65% of Indian families have zero life cover. If you earn, your family's financial security depends entirely on you staying alive.",
            cover(ids::LIFE_COVER, "What is your total life cover?", 5.0, 200.0),
        ),
        city(),
    ]
}

fn family() -> Question {
    Question {
        id: ids::FAMILY,
        title: "Who's in your family?",
        subtitle: Some("Select everyone you'd want financially protected."),
        why: Some(
            "Each member adds to your total hospitalisation exposure. More members = more risk surface.",
        ),
        // You are always part of the household, so an empty selection is valid.
        required: false,
        kind: QuestionKind::MultiSelect {
            options: vec![
                QuestionOption::plain(ids::SPOUSE, "Spouse"),
                QuestionOption {
                    id: ids::CHILDREN,
                    label: "Children",
                    exclusive: false,
                    dependent: Dependent::Counter(CounterPrompt {
                        id: ids::CHILDREN_COUNT,
                        label: "Number of children",
                        min: 1,
                        max: MAX_CHILDREN,
                    }),
                },
                QuestionOption {
                    id: ids::PARENTS,
                    label: "Parents",
                    exclusive: false,
                    dependent: Dependent::Counter(CounterPrompt {
                        id: ids::PARENTS_COUNT,
                        label: "Number of parents",
                        min: 1,
                        max: MAX_PARENTS,
                    }),
                },
            ],
        },
    }
}

fn dependents() -> Question {
    Question {
        id: ids::DEPENDENTS,
        title: "Who depends on your income?",
        subtitle: Some("Select members who'd face hardship if your income stopped tomorrow."),
        why: Some(
            "Dependents determine your life insurance need. More dependents = higher cover requirement.",
        ),
        required: false,
        kind: QuestionKind::MultiSelect {
            options: vec![
                QuestionOption::plain(ids::SPOUSE, "Spouse / Partner"),
                QuestionOption::plain(ids::CHILDREN, "Children"),
                QuestionOption::plain(ids::PARENTS, "Parents"),
            ],
        },
    }
}

fn ages() -> Question {
    const CHILD_LABELS: [&str; 6] = [
        "Child 1", "Child 2", "Child 3", "Child 4", "Child 5", "Child 6",
    ];
    const PARENT_LABELS: [&str; 4] = ["Parent 1", "Parent 2", "Parent 3", "Parent 4"];

    let age = InputKind::Numeric {
        min: 0.0,
        max: 99.0,
    };

    let mut fields = vec![
        InputField {
            id: ids::SELF_AGE,
            label: "You",
            input: age,
            visibility: Visibility::Always,
        },
        InputField {
            id: ids::SPOUSE_AGE,
            label: "Spouse",
            input: age,
            visibility: Visibility::WhenSelected {
                question: ids::FAMILY,
                option: ids::SPOUSE,
            },
        },
    ];

    for (index, (id, label)) in ids::CHILD_AGES.into_iter().zip(CHILD_LABELS).enumerate() {
        fields.push(InputField {
            id,
            label,
            input: age,
            visibility: Visibility::WhenCountAtLeast {
                question: ids::FAMILY,
                option: ids::CHILDREN,
                counter: ids::CHILDREN_COUNT,
                count: index as u8 + 1,
            },
        });
    }

    for (index, (id, label)) in ids::PARENT_AGES.into_iter().zip(PARENT_LABELS).enumerate() {
        fields.push(InputField {
            id,
            label,
            input: age,
            visibility: Visibility::WhenCountAtLeast {
                question: ids::FAMILY,
                option: ids::PARENTS,
                counter: ids::PARENTS_COUNT,
                count: index as u8 + 1,
            },
        });
    }

    Question {
        id: ids::AGES,
        title: "How old are your family members?",
        subtitle: Some("Age is the single biggest driver of hospitalisation cost."),
        why: Some(
            "A 65-year-old parent costs ~8× more to hospitalise than a 30-year-old. Ages shape your entire risk profile.",
        ),
        required: true,
        kind: QuestionKind::FreeInput { fields },
    }
}

fn conditions() -> Question {
    Question {
        id: ids::CONDITIONS,
        title: "Any significant health conditions?",
        subtitle: Some("Select all that apply across any member."),
        why: Some(
            "Chronic conditions increase hospitalisation likelihood by 2–4×, raising your family's expected annual medical cost.",
        ),
        required: true,
        kind: QuestionKind::MultiSelect {
            options: vec![
                QuestionOption::plain("diabetes", "Diabetes"),
                QuestionOption::plain("heart", "Heart disease / hypertension"),
                QuestionOption::plain("cancer", "Cancer history"),
                QuestionOption::plain("kidney", "Kidney / liver disease"),
                QuestionOption::plain("ortho", "Orthopaedic / joint issues"),
                QuestionOption::plain("respiratory", "Asthma / respiratory"),
                QuestionOption::plain("mental", "Mental health condition"),
                QuestionOption {
                    id: ids::NO_CONDITIONS,
                    label: "None, everyone's in good health",
                    exclusive: true,
                    dependent: Dependent::None,
                },
            ],
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn amount(
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    why: &'static str,
    field_id: &'static str,
    field_label: &'static str,
    min: f64,
    max: f64,
) -> Question {
    Question {
        id,
        title,
        subtitle: Some(subtitle),
        why: Some(why),
        required: true,
        kind: QuestionKind::FreeInput {
            fields: vec![InputField {
                id: field_id,
                label: field_label,
                input: InputKind::Numeric { min, max },
                visibility: Visibility::Always,
            }],
        },
    }
}

fn insurance(id: &'static str, title: &'static str, why: &'static str, cover: Question) -> Question {
    Question {
        id,
        title,
        subtitle: None,
        why: Some(why),
        required: true,
        kind: QuestionKind::SingleSelect {
            options: vec![
                QuestionOption {
                    id: ids::YES,
                    label: "Yes, I do",
                    exclusive: false,
                    dependent: Dependent::FollowUp(Box::new(cover)),
                },
                QuestionOption::plain(ids::NO, "No"),
            ],
        },
    }
}

fn cover(id: &'static str, title: &'static str, min: f64, max: f64) -> Question {
    Question {
        id,
        title,
        subtitle: None,
        why: None,
        required: true,
        kind: QuestionKind::FreeInput {
            fields: vec![InputField {
                id: ids::COVER_LAKHS,
                label: "Sum insured (₹ lakh)",
                input: InputKind::Numeric { min, max },
                visibility: Visibility::Always,
            }],
        },
    }
}

fn city() -> Question {
    Question {
        id: ids::CITY,
        title: "Which city do you live in?",
        subtitle: Some("Medical costs vary a lot between cities."),
        why: Some(
            "A knee replacement in Mumbai costs ₹3.5L; the same in Nagpur costs ₹1.8L. Location calibrates your risk numbers to real local costs.",
        ),
        required: true,
        kind: QuestionKind::FreeInput {
            fields: vec![InputField {
                id: ids::CITY_NAME,
                label: "City or PIN code",
                input: InputKind::Text { min_len: 2 },
                visibility: Visibility::Always,
            }],
        },
    }
}

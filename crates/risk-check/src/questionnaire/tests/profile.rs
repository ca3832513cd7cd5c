use super::common::*;
use crate::questionnaire::{
    FamilyMember, HealthCondition, HouseholdProfile, MemberRole, Questionnaire,
};

#[test]
fn worked_example_projects_two_members() {
    let completed = Questionnaire::standard()
        .replay(&worked_example())
        .expect("complete answer set");

    let profile = HouseholdProfile::from_completed(&completed);

    let ages: Vec<(MemberRole, u8)> = profile
        .members
        .iter()
        .map(|member| (member.role, member.age))
        .collect();
    assert_eq!(
        ages,
        vec![(MemberRole::PrimaryEarner, 34), (MemberRole::Parent, 62)]
    );
    assert_eq!(profile.members[1].initials, "P1");
    assert_eq!(profile.dependent_count, 1);
    assert!(profile.conditions.is_empty());
    assert_eq!(profile.monthly_income_lakhs, 12.0);
    assert_eq!(profile.debt_lakhs, 30.0);
    assert_eq!(profile.savings_lakhs, 10.0);
    assert_eq!(profile.health_cover_lakhs, Some(5.0));
    assert_eq!(profile.life_cover_lakhs, None);
    assert_eq!(profile.city, "Mumbai");
}

#[test]
fn members_follow_self_spouse_children_parents_order() {
    let mut answers = worked_example();
    answers.insert(key("family"), list(&["parents", "spouse", "children"]));
    answers.insert(key("family.children_count"), text("2"));
    answers.insert(key("ages.spouse"), text("32"));
    answers.insert(key("ages.child_1"), text("4"));
    answers.insert(key("ages.child_2"), text("9"));

    let completed = Questionnaire::standard()
        .replay(&answers)
        .expect("complete answer set");
    let profile = HouseholdProfile::from_completed(&completed);

    let names: Vec<&str> = profile
        .members
        .iter()
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, vec!["You", "Spouse", "Child 1", "Child 2", "Parent 1"]);
    let colors: Vec<&str> = profile.members.iter().map(|member| member.color).collect();
    assert_eq!(
        colors,
        vec!["#7c5cf6", "#3b82f6", "#10b981", "#10b981", "#ec4899"]
    );
}

#[test]
fn dependents_only_count_groups_in_the_family() {
    let mut answers = worked_example();
    answers.insert(key("dependents"), list(&["spouse", "parents", "children"]));

    let completed = Questionnaire::standard()
        .replay(&answers)
        .expect("complete answer set");
    let profile = HouseholdProfile::from_completed(&completed);

    assert_eq!(profile.dependent_count, 1);
}

#[test]
fn conditions_are_typed_and_flag_critical_illness() {
    let mut answers = worked_example();
    answers.insert(key("conditions"), list(&["heart", "diabetes"]));

    let completed = Questionnaire::standard()
        .replay(&answers)
        .expect("complete answer set");
    let profile = HouseholdProfile::from_completed(&completed);

    assert_eq!(
        profile.conditions,
        vec![HealthCondition::Diabetes, HealthCondition::Heart]
    );
    assert!(profile.has_critical_condition());
}

#[test]
fn default_self_is_a_34_year_old_primary_earner() {
    let member = FamilyMember::default_self();

    assert_eq!(member.age, 34);
    assert_eq!(member.role, MemberRole::PrimaryEarner);
    assert_eq!(member.initials, "Me");
}

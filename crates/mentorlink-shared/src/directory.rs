//! Directory ranking: which mentors a mentee sees, and in what order.
//!
//! Ranking is two-tier only. A mentor is either recommended (one of its
//! skill tags equals one of the mentee's interest tokens) or not; there is
//! no score. Both tiers are narrowed by the same free-text query and keep
//! the order of the input.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::Mentor;
use crate::tags::{split_tags, InterestProfile};

/// Result of [`rank`].
///
/// `all` is not deduplicated against `recommended`: a recommended mentor
/// shows up in both lists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectoryView<'a> {
    pub recommended: Vec<&'a Mentor>,
    pub all: Vec<&'a Mentor>,
}

impl DirectoryView<'_> {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Case-insensitive substring match against name, skills or mentorship areas.
///
/// An empty query matches everyone.
pub fn matches_query(mentor: &Mentor, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [&mentor.name, &mentor.skills, &mentor.mentorship_areas]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Token-level intersection of the interests with the mentor's skill tags.
pub fn is_recommended(mentor: &Mentor, interests: &InterestProfile) -> bool {
    if interests.is_empty() {
        return false;
    }
    split_tags(&mentor.skills)
        .iter()
        .any(|tag| interests.contains(tag))
}

pub fn rank<'a>(
    mentors: &'a [Mentor],
    interests: &InterestProfile,
    query: &str,
) -> DirectoryView<'a> {
    let mut seen = HashSet::new();
    let mut view = DirectoryView {
        recommended: Vec::new(),
        all: Vec::new(),
    };

    for mentor in mentors {
        // First occurrence of an ID wins.
        if !seen.insert(&mentor.id) {
            continue;
        }
        if !matches_query(mentor, query) {
            continue;
        }
        if is_recommended(mentor, interests) {
            view.recommended.push(mentor);
        }
        view.all.push(mentor);
    }

    tracing::debug!(
        total = mentors.len(),
        matched = view.all.len(),
        recommended = view.recommended.len(),
        "Ranked mentor directory"
    );

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MentorId;

    fn mentor(id: &str, name: &str, skills: &str, areas: &str) -> Mentor {
        Mentor {
            id: MentorId::from(id),
            name: name.to_string(),
            skills: skills.to_string(),
            mentorship_areas: areas.to_string(),
            ..Default::default()
        }
    }

    fn names(list: &[&Mentor]) -> Vec<String> {
        list.iter().map(|m| m.name.clone()).collect()
    }

    fn sample() -> Vec<Mentor> {
        vec![
            mentor("1", "Ada", "React, Node.js", "Career Development"),
            mentor("2", "Grace", "COBOL,  Compilers ", "Leadership"),
            mentor("3", "Linus", "C, Git", "Open Source"),
            mentor("4", "Barbara", "", "Distributed Systems"),
        ]
    }

    #[test]
    fn empty_interests_recommend_nobody() {
        let mentors = sample();
        let view = rank(&mentors, &InterestProfile::default(), "");
        assert!(view.recommended.is_empty());
        assert_eq!(view.all.len(), 4);
    }

    #[test]
    fn query_matches_any_of_three_fields_case_insensitively() {
        let mentors = sample();
        let none = InterestProfile::default();

        assert_eq!(names(&rank(&mentors, &none, "react").all), vec!["Ada"]);
        assert_eq!(names(&rank(&mentors, &none, "LEADER").all), vec!["Grace"]);
        assert_eq!(names(&rank(&mentors, &none, "lin").all), vec!["Linus"]);
        assert!(rank(&mentors, &none, "haskell").is_empty());
    }

    #[test]
    fn recommended_mentors_also_appear_in_all() {
        let mentors = sample();
        let interests = InterestProfile::parse(" compilers , git");
        let view = rank(&mentors, &interests, "");

        assert_eq!(names(&view.recommended), vec!["Grace", "Linus"]);
        assert_eq!(names(&view.all), vec!["Ada", "Grace", "Linus", "Barbara"]);
    }

    #[test]
    fn recommendation_needs_whole_tag_equality() {
        let mentors = sample();
        // "node" is a substring of "node.js" but not a tag of its own.
        let view = rank(&mentors, &InterestProfile::parse("node"), "");
        assert!(view.recommended.is_empty());

        let view = rank(&mentors, &InterestProfile::parse("node.js"), "");
        assert_eq!(names(&view.recommended), vec!["Ada"]);
    }

    #[test]
    fn query_narrows_both_lists() {
        let mentors = sample();
        let interests = InterestProfile::parse("compilers, react");
        let view = rank(&mentors, &interests, "cobol");

        assert_eq!(names(&view.recommended), vec!["Grace"]);
        assert_eq!(names(&view.all), vec!["Grace"]);
    }

    #[test]
    fn empty_skills_never_recommended_and_never_panic() {
        let mentors = sample();
        let interests = InterestProfile::parse("distributed systems");
        let view = rank(&mentors, &interests, "distributed");

        // Matched by the query through mentorship areas, not recommended.
        assert_eq!(names(&view.all), vec!["Barbara"]);
        assert!(view.recommended.is_empty());
    }

    #[test]
    fn single_tag_without_commas_is_one_token() {
        let mentors = vec![mentor("9", "Solo", "  Rust  ", "")];
        let view = rank(&mentors, &InterestProfile::parse("rust"), "");
        assert_eq!(names(&view.recommended), vec!["Solo"]);
    }

    #[test]
    fn duplicate_ids_are_listed_once() {
        let mut mentors = sample();
        mentors.push(mentor("1", "Ada (stale copy)", "React", ""));
        let view = rank(&mentors, &InterestProfile::parse("react"), "");

        assert_eq!(names(&view.recommended), vec!["Ada"]);
        assert_eq!(view.all.len(), 4);
    }
}

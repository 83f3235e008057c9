//! Natural-language answers from structured knowledge.
//!
//! Every template is a pure function of (intent, record, query). Each topic
//! has a rich form used when the record carries enough data and a general
//! advice form used when it does not, so an answer is never empty.

use super::completeness;
use crate::types::intent::Intent;
use crate::types::record::{truncate_chars, CompanyKnowledgeRecord};

/// Skills listed in the skills answer.
const SKILLS_SHOWN: usize = 15;
/// Skills listed in the company overview.
const OVERVIEW_SKILLS_SHOWN: usize = 8;
/// Skills listed in the composite answer.
const SUMMARY_SKILLS_SHOWN: usize = 10;
/// Excerpt length for long fields in the composite answer.
const SUMMARY_EXCERPT_LEN: usize = 200;

/// Minimum lengths for the rich forms.
const RICH_PROCESS_LEN: usize = 50;
const RICH_ELIGIBILITY_LEN: usize = 20;
const RICH_SALARY_LEN: usize = 10;

/// Topic an answer is about, after message-text overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Location,
    Skills,
    Interview,
    Eligibility,
    Package,
    Overview,
    Summary,
}

/// Pick the topic for a request.
///
/// Message text can override the classifier: any mention of "skill" is a
/// skills question, "where" or "located" a location question.
pub fn topic(intent: Intent, query: &str) -> Topic {
    let q = query.to_lowercase();

    if intent == Intent::Location || q.contains("where") || q.contains("located") {
        return Topic::Location;
    }
    if intent == Intent::Skills
        || q.contains("skill")
        || q.contains("need to prepare")
        || q.contains("prepare for")
    {
        return Topic::Skills;
    }
    if intent == Intent::Interview
        || completeness::asks_about_process(&q)
        || q.contains("hiring process")
        || q.contains("selection process")
    {
        return Topic::Interview;
    }
    match intent {
        Intent::Eligibility => Topic::Eligibility,
        Intent::Package => Topic::Package,
        Intent::CompanyInfo => Topic::Overview,
        _ => Topic::Summary,
    }
}

/// Answer a question about a company from its record.
pub fn render(intent: Intent, record: &CompanyKnowledgeRecord, query: &str) -> String {
    let name = if record.company_name.trim().is_empty() {
        "this company"
    } else {
        record.company_name.trim()
    };

    match topic(intent, query) {
        Topic::Location => location(name, record),
        Topic::Skills => skills(name, record),
        Topic::Interview => interview(name, record),
        Topic::Eligibility => eligibility(name, record),
        Topic::Package => package(name, record),
        Topic::Overview => overview(name, record),
        Topic::Summary => summary(name, record),
    }
}

fn location(name: &str, record: &CompanyKnowledgeRecord) -> String {
    if record.location.is_empty() {
        format!(
            "I don't have a location for {name} yet. I'm looking it up, so ask again \
             shortly or check the contact page on their official website."
        )
    } else {
        format!(
            "**Where {name} is located**\n\n\
             {name} is based in **{}**.\n\n\
             Their official website lists offices and contact details.",
            record.location
        )
    }
}

fn skills(name: &str, record: &CompanyKnowledgeRecord) -> String {
    if record.skills.is_empty() {
        return format!(
            "**Preparing for {name}**\n\n\
             I haven't found {name}'s exact skill requirements yet. Most technology \
             recruiters look for:\n\n\
             - A programming language you know well (Java, Python, C++ or JavaScript)\n\
             - Data structures and algorithms: arrays, trees, graphs, dynamic programming\n\
             - Databases: SQL plus one NoSQL store\n\
             - Git and a basic grasp of system design\n\n\
             Role-specific extras: React or Node.js for web roles, AWS/Azure/GCP for cloud \
             roles, Docker and Kubernetes for DevOps, TensorFlow or PyTorch for ML.\n\n\
             For {name} specifically, read their careers page and current job postings."
        );
    }

    let list = record
        .skills
        .iter()
        .take(SKILLS_SHOWN)
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "**Skills {name} looks for**\n\n\
         {list}\n\n\
         **How to prepare**\n\
         - Build at least one project that uses these technologies end to end\n\
         - Practise timed coding problems on LeetCode or HackerRank\n\
         - Be ready to explain the trade-offs behind your choices\n\
         - Learn the fundamentals first, then the frameworks on top of them"
    )
}

fn interview(name: &str, record: &CompanyKnowledgeRecord) -> String {
    if record.process.chars().count() > RICH_PROCESS_LEN {
        return format!(
            "**{name} interview process**\n\n\
             {}\n\n\
             **Preparation tips**\n\
             - Find out what each round tests and practise for it\n\
             - Prepare STAR examples (situation, task, action, result)\n\
             - Read up on {name}'s products and recent news\n\
             - Do at least one mock interview\n\
             - Have your own questions ready for the interviewer",
            record.process
        );
    }

    format!(
        "**Interviewing at {name}**\n\n\
         I don't have {name}'s exact process yet. A typical technology hiring process \
         looks like this:\n\n\
         1. **Online assessment**: one or two coding problems in 60 to 90 minutes\n\
         2. **Technical interviews**: problem solving, your projects, sometimes system design\n\
         3. **HR round**: motivation, culture fit, compensation\n\
         4. **Manager round** (some companies): role and team fit\n\n\
         Interview write-ups on GeeksforGeeks and Glassdoor, and recent hires on LinkedIn, \
         are good sources for {name}-specific details."
    )
}

fn eligibility(name: &str, record: &CompanyKnowledgeRecord) -> String {
    if record.eligibility.chars().count() > RICH_ELIGIBILITY_LEN {
        return format!(
            "**{name} eligibility**\n\n\
             {}\n\n\
             Check the latest job posting before applying; criteria change between \
             hiring seasons.",
            record.eligibility
        );
    }

    format!(
        "**Eligibility at {name}**\n\n\
         I don't have {name}'s exact criteria yet. Common requirements are:\n\n\
         - A degree in Computer Science, IT or a related branch\n\
         - A CGPA of around 7.0 or above\n\
         - No active backlogs\n\
         - Final-year student or recent graduate\n\n\
         Their careers page has the authoritative list."
    )
}

fn package(name: &str, record: &CompanyKnowledgeRecord) -> String {
    if record.salary.chars().count() > RICH_SALARY_LEN {
        return format!(
            "**{name} compensation**\n\n\
             {}\n\n\
             Actual offers vary with role, location and experience, and may include \
             benefits beyond base pay.",
            record.salary
        );
    }

    format!(
        "**Compensation at {name}**\n\n\
         I don't have {name}'s salary figures yet. Packages depend on role, experience, \
         city and skills. Typical ranges in India:\n\n\
         - Entry level: 3 to 8 LPA\n\
         - Mid level: 8 to 20 LPA\n\
         - Senior: 20 LPA and above\n\n\
         AmbitionBox, Glassdoor and {name}'s own job postings give company-specific numbers."
    )
}

fn overview(name: &str, record: &CompanyKnowledgeRecord) -> String {
    let mut out = format!("**About {name}**\n\n");
    if !record.description.is_empty() {
        out.push_str(&record.description);
        out.push_str("\n\n");
    }
    if !record.location.is_empty() {
        out.push_str(&format!("**Location:** {}\n\n", record.location));
    }
    if !record.skills.is_empty() {
        out.push_str(&format!(
            "**Key skills:** {}\n\n",
            joined(&record.skills, OVERVIEW_SKILLS_SHOWN)
        ));
    }
    out.push_str("Their official website has more.");
    out
}

fn summary(name: &str, record: &CompanyKnowledgeRecord) -> String {
    let header = format!("**{name}**\n\n");
    let mut out = header.clone();

    if !record.description.is_empty() {
        out.push_str(&format!("{}\n\n", record.description));
    }
    if !record.location.is_empty() {
        out.push_str(&format!("**Location:** {}\n\n", record.location));
    }
    if !record.skills.is_empty() {
        out.push_str(&format!(
            "**Skills:** {}\n\n",
            joined(&record.skills, SUMMARY_SKILLS_SHOWN)
        ));
    }
    if !record.eligibility.is_empty() {
        out.push_str(&format!(
            "**Eligibility:** {}\n\n",
            excerpt(&record.eligibility)
        ));
    }
    if !record.process.is_empty() {
        out.push_str(&format!(
            "**Interview process:** {}\n\n",
            excerpt(&record.process)
        ));
    }
    if !record.salary.is_empty() {
        out.push_str(&format!("**Salary:** {}\n\n", record.salary));
    }

    if out == header {
        out.push_str(&format!(
            "I can tell you about {name}'s:\n\
             - required skills\n\
             - interview process\n\
             - eligibility criteria\n\
             - salary\n\
             - location\n\n\
             Ask about any of these."
        ));
    }
    out.trim_end().to_string()
}

fn joined(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > SUMMARY_EXCERPT_LEN {
        format!("{}...", truncate_chars(text, SUMMARY_EXCERPT_LEN))
    } else {
        text.to_string()
    }
}

/// Answer a message that names no company.
pub fn render_general(intent: Intent, query: &str) -> String {
    match intent {
        Intent::Greeting => "Hello! I'm your placement assistant. I can help with:\n\n\
             - what a company does and where it is\n\
             - skills a company looks for\n\
             - interview processes and preparation\n\
             - eligibility criteria\n\
             - salary packages\n\
             - placement drives\n\n\
             What would you like to know?"
            .to_string(),
        Intent::Resume => "**Resume tips for placements**\n\n\
             **Format**\n\
             - One page, two at most\n\
             - A clean, readable font and consistent section order\n\n\
             **Content**\n\
             - Technical skills near the top\n\
             - Projects with what you built and the result\n\
             - Numbers wherever you can (users, speed-ups, ranks)\n\
             - GitHub and LinkedIn links\n\n\
             Tailor it to each company and proofread it twice."
            .to_string(),
        Intent::Roadmap => "**Placement preparation roadmap**\n\n\
             **Months 1-2: fundamentals**\n\
             - Data structures and algorithms\n\
             - One programming language in depth\n\
             - Daily easy and medium problems\n\n\
             **Months 3-4: depth**\n\
             - System design basics\n\
             - Databases and SQL\n\
             - A framework relevant to your target roles\n\n\
             **Months 5-6: interviews**\n\
             - Mock interviews\n\
             - Behavioural questions\n\
             - Research on the companies you're targeting"
            .to_string(),
        Intent::Internship => "**Finding internships**\n\n\
             - Company careers pages\n\
             - LinkedIn, Internshala, Naukri and Indeed\n\
             - Your campus placement cell\n\n\
             Apply early, tailor your resume to each posting and prepare for a \
             technical interview even for short internships."
            .to_string(),
        _ => format!(
            "You asked: \"{}\"\n\n\
             Mention a company and I'll look it up. For example:\n\
             - \"What is Meril?\"\n\
             - \"Tell me about Deloitte\"\n\
             - \"Deloitte skills\"\n\
             - \"Meril eligibility\"",
            query.trim()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meril() -> CompanyKnowledgeRecord {
        CompanyKnowledgeRecord::new("Meril")
            .with_description("Meril designs and manufactures medical devices.")
            .with_eligibility("CGPA 7.0+, no active backlogs")
            .with_location("Vapi, Gujarat")
    }

    #[test]
    fn test_eligibility_rich_form_contains_field() {
        let answer = render(Intent::Eligibility, &meril(), "Meril eligibility");
        assert!(answer.contains("CGPA 7.0+, no active backlogs"));
    }

    #[test]
    fn test_skill_mention_overrides_intent() {
        assert_eq!(topic(Intent::Package, "meril skill and salary"), Topic::Skills);
        assert_eq!(topic(Intent::Skills, "where is meril"), Topic::Location);
    }

    #[test]
    fn test_interview_selection_mention_is_interview_topic() {
        assert_eq!(
            topic(Intent::Eligibility, "meril criteria and interview selection"),
            Topic::Interview
        );
        assert_eq!(topic(Intent::General, "interview hiring at meril"), Topic::Interview);
        assert_eq!(topic(Intent::Eligibility, "meril selection criteria"), Topic::Eligibility);
    }

    #[test]
    fn test_generic_forms_when_fields_missing() {
        let empty = CompanyKnowledgeRecord::new("Zoho");
        for intent in [
            Intent::Location,
            Intent::Skills,
            Intent::Interview,
            Intent::Eligibility,
            Intent::Package,
            Intent::CompanyInfo,
            Intent::General,
        ] {
            let answer = render(intent, &empty, "");
            assert!(!answer.trim().is_empty(), "{intent} rendered nothing");
            assert!(answer.contains("Zoho"), "{intent} lost the company name");
        }
    }

    #[test]
    fn test_short_eligibility_uses_generic_form() {
        let record = CompanyKnowledgeRecord::new("Zoho").with_eligibility("B.Tech");
        let answer = render(Intent::Eligibility, &record, "");
        assert!(!answer.contains("B.Tech"));
        assert!(answer.contains("CGPA"));
    }

    #[test]
    fn test_summary_lists_present_fields_only() {
        let answer = render(Intent::General, &meril(), "meril");
        assert!(answer.contains("**Location:** Vapi, Gujarat"));
        assert!(answer.contains("**Eligibility:** CGPA 7.0+"));
        assert!(!answer.contains("**Salary:**"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render(Intent::Skills, &meril(), "skills?");
        let b = render(Intent::Skills, &meril(), "skills?");
        assert_eq!(a, b);
    }

    #[test]
    fn test_general_answers() {
        assert!(render_general(Intent::Greeting, "hi").starts_with("Hello!"));
        assert!(render_general(Intent::Resume, "resume").contains("Resume tips"));
        let prompt = render_general(Intent::General, "how do placements work");
        assert!(prompt.contains("how do placements work"));
        assert!(prompt.contains("Mention a company"));
    }
}

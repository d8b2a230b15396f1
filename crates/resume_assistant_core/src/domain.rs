//! crates/resume_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application: the resume
//! document, its seven item collections, and the update-by-id protocol.
//! These structs are independent of any storage backend or transport format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Item Identity
//=========================================================================================

/// Generates a short random ID: the given prefix followed by eight lowercase
/// hex characters taken from a v4 UUID.
///
/// Uniqueness is probabilistic. Collisions are not detected; the id space is
/// large enough for documents with a few hundred items.
pub fn short_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..8])
}

fn default_schema_version() -> u32 {
    1
}

//=========================================================================================
// Item Variants
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Website,
    Github,
    Linkedin,
}

impl LinkType {
    /// The bundled icon shipped with the export templates for this link type.
    pub fn default_icon(&self) -> &'static str {
        match self {
            LinkType::Website => "icons/website.png",
            LinkType::Github => "icons/github.png",
            LinkType::Linkedin => "icons/linkedin.png",
        }
    }
}

/// An external link (personal site, GitHub, LinkedIn) shown in the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub id: String,
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
    /// Explicit icon override; when `None` the icon derives from `link_type`.
    pub link_icon: Option<String>,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            id: short_id("lin_"),
            label: String::new(),
            url: "https://example.com".to_string(),
            link_type: LinkType::Website,
            link_icon: None,
            visible: true,
            schema_version: 1,
        }
    }
}

impl Link {
    /// Resolves the icon path, falling back to the `link_type` default.
    pub fn icon(&self) -> &str {
        self.link_icon
            .as_deref()
            .unwrap_or_else(|| self.link_type.default_icon())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Numeric rank used by the form renderer's level slider.
    pub fn rank(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            id: short_id("ski_"),
            name: String::new(),
            level: SkillLevel::Beginner,
            visible: true,
            schema_version: 1,
        }
    }
}

/// A single position held at a company, with free-form bullet points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub bullets: Vec<String>,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            id: short_id("exp_"),
            company: String::new(),
            role: String::new(),
            start: None,
            end: None,
            location: None,
            summary: None,
            bullets: Vec::new(),
            visible: true,
            schema_version: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub details: Option<String>,
    pub location: Option<String>,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            id: short_id("edu_"),
            institution: String::new(),
            degree: String::new(),
            start: None,
            end: None,
            details: None,
            location: None,
            visible: true,
            schema_version: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: Option<String>,
    pub certification_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub link: Option<String>,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Certification {
    fn default() -> Self {
        Self {
            id: short_id("cer_"),
            name: String::new(),
            issuer: None,
            certification_date: None,
            credential_id: None,
            link: None,
            visible: true,
            schema_version: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: short_id("pro_"),
            name: String::new(),
            description: None,
            technologies: Vec::new(),
            link: None,
            visible: true,
            schema_version: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageProficiency {
    Basic,
    Conversational,
    Fluent,
    Native,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub proficiency: LanguageProficiency,
    pub visible: bool,
    pub schema_version: u32,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            id: short_id("lan_"),
            name: String::new(),
            proficiency: LanguageProficiency::Basic,
            visible: true,
            schema_version: 1,
        }
    }
}

//=========================================================================================
// ResumeElement (closed sum type over all item variants)
//=========================================================================================

/// One addressable unit of a resume, as exchanged over the edit protocol.
///
/// The `type` tag makes serialized elements self-describing, so tool calls
/// carrying a replacement element do not need to name the target collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResumeElement {
    Link(Link),
    Skill(Skill),
    Experience(Experience),
    Education(Education),
    Certification(Certification),
    Project(Project),
    Language(Language),
}

impl ResumeElement {
    pub fn id(&self) -> &str {
        match self {
            ResumeElement::Link(e) => &e.id,
            ResumeElement::Skill(e) => &e.id,
            ResumeElement::Experience(e) => &e.id,
            ResumeElement::Education(e) => &e.id,
            ResumeElement::Certification(e) => &e.id,
            ResumeElement::Project(e) => &e.id,
            ResumeElement::Language(e) => &e.id,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            ResumeElement::Link(e) => e.visible,
            ResumeElement::Skill(e) => e.visible,
            ResumeElement::Experience(e) => e.visible,
            ResumeElement::Education(e) => e.visible,
            ResumeElement::Certification(e) => e.visible,
            ResumeElement::Project(e) => e.visible,
            ResumeElement::Language(e) => e.visible,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResumeElement::Link(_) => "link",
            ResumeElement::Skill(_) => "skill",
            ResumeElement::Experience(_) => "experience",
            ResumeElement::Education(_) => "education",
            ResumeElement::Certification(_) => "certification",
            ResumeElement::Project(_) => "project",
            ResumeElement::Language(_) => "language",
        }
    }
}

//=========================================================================================
// Resume (root aggregate)
//=========================================================================================

/// The full resume document. Owns every item in its seven ordered collections;
/// items are never shared across documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    /// Generated once at creation, immutable thereafter.
    #[serde(default = "Resume::new_id")]
    pub id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    // Schema versioning for future migrations; readers must accept documents
    // written with a lower version number.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Resume {
    fn new_id() -> String {
        short_id("res_")
    }

    /// Creates an empty resume with a fresh identity.
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Self::new_id(),
            name: name.into(),
            date_of_birth,
            title: None,
            email: None,
            phone: None,
            location: None,
            summary: None,
            links: Vec::new(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            projects: Vec::new(),
            languages: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: 1,
        }
    }

    /// Replaces the single item whose id equals `element_id`.
    ///
    /// Collections are scanned in a fixed order (links, skills, experience,
    /// education, certifications, projects, languages) and the first match
    /// wins; the replacement keeps the matched item's position. The new
    /// element's own id field is taken as-is, so a caller that wants identity
    /// to survive the edit must copy the old id onto the replacement.
    ///
    /// The replacement must be the same variant as the collection the id was
    /// found in; a mismatched variant is rejected. On success `updated_at` is
    /// set to now. Returns `false` when the id is empty, unknown, or the
    /// variant does not match, leaving the document untouched.
    pub fn update_element(&mut self, element_id: &str, new_element: ResumeElement) -> bool {
        if element_id.is_empty() {
            return false;
        }

        if let Some(pos) = self.links.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Link(link) => {
                    self.links[pos] = link;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.skills.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Skill(skill) => {
                    self.skills[pos] = skill;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.experience.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Experience(experience) => {
                    self.experience[pos] = experience;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.education.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Education(education) => {
                    self.education[pos] = education;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.certifications.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Certification(certification) => {
                    self.certifications[pos] = certification;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.projects.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Project(project) => {
                    self.projects[pos] = project;
                    self.touch();
                    true
                }
                _ => false,
            };
        }
        if let Some(pos) = self.languages.iter().position(|e| e.id == element_id) {
            return match new_element {
                ResumeElement::Language(language) => {
                    self.languages[pos] = language;
                    self.touch();
                    true
                }
                _ => false,
            };
        }

        false
    }

    /// Produces an independent copy retaining only visible items, for the
    /// rendering and export surfaces. The source document is not mutated.
    pub fn filter_visible(&self) -> Resume {
        let mut filtered = self.clone();
        filtered.links.retain(|e| e.visible);
        filtered.skills.retain(|e| e.visible);
        filtered.experience.retain(|e| e.visible);
        filtered.education.retain(|e| e.visible);
        filtered.certifications.retain(|e| e.visible);
        filtered.projects.retain(|e| e.visible);
        filtered.languages.retain(|e| e.visible);
        filtered
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_resume() -> Resume {
        let mut resume =
            Resume::new("Ada Lovelace", NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());
        resume.links.push(Link {
            id: "lin_11111111".to_string(),
            label: "GitHub".to_string(),
            url: "https://github.com/ada".to_string(),
            link_type: LinkType::Github,
            ..Link::default()
        });
        resume.skills.push(Skill {
            id: "ski_22222222".to_string(),
            name: "Analysis".to_string(),
            level: SkillLevel::Expert,
            ..Skill::default()
        });
        resume.experience.push(Experience {
            id: "exp_ab12cd34".to_string(),
            company: "Analytical Engines Ltd".to_string(),
            role: "Programmer".to_string(),
            ..Experience::default()
        });
        resume
    }

    #[test]
    fn short_ids_are_prefixed_and_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let item = Experience::default();
            assert!(item.id.starts_with("exp_"));
            assert_eq!(item.id.len(), "exp_".len() + 8);
            assert!(seen.insert(item.id));
        }
    }

    #[test]
    fn update_element_replaces_matching_item_in_place() {
        let mut resume = sample_resume();
        let before = resume.updated_at;

        let replacement = Experience {
            id: "exp_ab12cd34".to_string(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            ..Experience::default()
        };
        assert!(resume.update_element("exp_ab12cd34", ResumeElement::Experience(replacement)));
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Acme");
        assert_eq!(resume.experience[0].role, "Engineer");
        assert!(resume.updated_at > before);

        // Unknown id: nothing changes, including the modification stamp.
        let after_hit = resume.updated_at;
        let miss = Experience::default();
        assert!(!resume.update_element("exp_nonexistent", ResumeElement::Experience(miss)));
        assert_eq!(resume.updated_at, after_hit);
        assert_eq!(resume.experience[0].company, "Acme");
    }

    #[test]
    fn update_element_rejects_empty_id() {
        let mut resume = sample_resume();
        let before = resume.updated_at;
        assert!(!resume.update_element("", ResumeElement::Skill(Skill::default())));
        assert_eq!(resume.updated_at, before);
    }

    #[test]
    fn update_element_rejects_mismatched_variant() {
        let mut resume = sample_resume();
        let before = resume.updated_at;
        // A skill aimed at an id that lives in the experience collection.
        let skill = Skill {
            id: "exp_ab12cd34".to_string(),
            name: "Juggling".to_string(),
            ..Skill::default()
        };
        assert!(!resume.update_element("exp_ab12cd34", ResumeElement::Skill(skill)));
        assert_eq!(resume.experience[0].company, "Analytical Engines Ltd");
        assert_eq!(resume.updated_at, before);
    }

    #[test]
    fn update_element_keeps_replacement_id_as_given() {
        let mut resume = sample_resume();
        let replacement = Skill {
            id: "ski_99999999".to_string(),
            name: "Calculus".to_string(),
            ..Skill::default()
        };
        assert!(resume.update_element("ski_22222222", ResumeElement::Skill(replacement)));
        // The old identity is gone; the new item carries whatever id it came with.
        assert_eq!(resume.skills[0].id, "ski_99999999");
        assert!(!resume.update_element("ski_22222222", ResumeElement::Skill(Skill::default())));
    }

    #[test]
    fn filter_visible_is_idempotent_and_non_mutating() {
        let mut resume = sample_resume();
        resume.skills.push(Skill {
            id: "ski_33333333".to_string(),
            name: "Hidden".to_string(),
            visible: false,
            ..Skill::default()
        });

        let filtered = resume.filter_visible();
        assert_eq!(filtered.skills.len(), 1);
        assert_eq!(filtered.skills[0].name, "Analysis");
        assert_eq!(filtered.experience.len(), 1);
        // Source is untouched.
        assert_eq!(resume.skills.len(), 2);
        // Applying twice is the same as once.
        assert_eq!(filtered.filter_visible(), filtered);
    }

    #[test]
    fn link_icon_derives_from_type_unless_overridden() {
        let link = Link {
            link_type: LinkType::Github,
            ..Link::default()
        };
        assert_eq!(link.icon(), "icons/github.png");

        let custom = Link {
            link_icon: Some("icons/custom.png".to_string()),
            ..Link::default()
        };
        assert_eq!(custom.icon(), "icons/custom.png");
    }

    #[test]
    fn skill_levels_rank_in_ascending_order() {
        assert!(SkillLevel::Beginner.rank() < SkillLevel::Intermediate.rank());
        assert!(SkillLevel::Intermediate.rank() < SkillLevel::Advanced.rank());
        assert!(SkillLevel::Advanced.rank() < SkillLevel::Expert.rank());
    }

    #[test]
    fn items_without_visibility_flag_deserialize_as_visible() {
        let skill: Skill = serde_json::from_str(r#"{"name": "Rust"}"#).unwrap();
        assert!(skill.visible);
        assert!(skill.id.starts_with("ski_"));
        assert_eq!(skill.schema_version, 1);
    }

    #[test]
    fn older_documents_without_new_collections_still_load() {
        let json = r#"{
            "name": "Ada Lovelace",
            "date_of_birth": "1815-12-10",
            "skills": [{"id": "ski_aaaa0000", "name": "Analysis", "level": "Expert"}]
        }"#;
        let resume: Resume = serde_json::from_str(json).unwrap();
        assert!(resume.id.starts_with("res_"));
        assert_eq!(resume.skills.len(), 1);
        assert!(resume.certifications.is_empty());
        assert_eq!(resume.schema_version, 1);
    }

    #[test]
    fn resume_element_round_trips_with_type_tag() {
        let element = ResumeElement::Experience(Experience {
            id: "exp_ab12cd34".to_string(),
            company: "Acme".to_string(),
            ..Experience::default()
        });
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains(r#""type":"experience""#));
        let back: ResumeElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), "exp_ab12cd34");
        assert_eq!(back.kind(), "experience");
    }
}

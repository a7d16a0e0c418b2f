//! Page sections backed by the API
//!
//! Each section loads its data once and renders one of three states. A load
//! failure is shown inline with a short message; the underlying error only
//! goes to the log.

use crate::boundary::{render_child, Component, RenderError};
use crate::view::{Element, View};
use portfolio_api_client::endpoints::projects::Project;
use portfolio_api_client::endpoints::skills::{GroupedSkills, Proficiency, Skill};
use portfolio_api_client::ApiService;
use tracing::{debug, error};

/// Shown when skills cannot be fetched
pub const SKILLS_LOAD_ERROR: &str = "Failed to load skills";

/// Shown when projects cannot be fetched
pub const PROJECTS_LOAD_ERROR: &str = "Failed to load projects";

/// Data fetched from the API
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    /// Request not finished yet
    #[default]
    Loading,
    /// Request succeeded
    Loaded(T),
    /// Request failed; holds the message shown to the visitor
    Failed(String),
}

impl<T> Loadable<T> {
    /// Loaded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Whether the request is still pending
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn render_with(&self, loaded: impl FnOnce(&T) -> Result<View, RenderError>) -> Result<View, RenderError> {
        match self {
            Self::Loading => Ok(Element::new("div")
                .class("loading")
                .attr("aria-busy", "true")
                .child("Loading...")
                .into()),
            Self::Failed(message) => Ok(Element::new("div")
                .class("load-error")
                .attr("role", "alert")
                .child(message.as_str())
                .into()),
            Self::Loaded(value) => loaded(value),
        }
    }
}

// ----------------------------------------------------------------------------
// Skills
// ----------------------------------------------------------------------------

/// Skills grouped by category
#[derive(Debug, Clone, Default)]
pub struct SkillsSection {
    skills: Loadable<GroupedSkills>,
}

impl SkillsSection {
    /// Section in the loading state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load state
    #[must_use]
    pub fn skills(&self) -> &Loadable<GroupedSkills> {
        &self.skills
    }

    /// Fetch grouped skills
    pub async fn load(&mut self, api: &ApiService) {
        self.skills = Loadable::Loading;
        self.skills = match api.skills().list_grouped().await {
            Ok(groups) => {
                debug!(categories = groups.len(), "Skills loaded");
                Loadable::Loaded(groups)
            }
            Err(e) => {
                error!(status = e.status, error = %e, "Error fetching skills");
                Loadable::Failed(SKILLS_LOAD_ERROR.to_string())
            }
        };
    }
}

impl Component for SkillsSection {
    fn render(&self) -> Result<View, RenderError> {
        self.skills.render_with(|groups| {
            let mut section = Element::new("section").attr("id", "skills");
            for (category, skills) in groups {
                let mut list = Element::new("ul");
                for skill in skills {
                    list = list.child(Element::new("li").child(render_child(&SkillCard(skill))?));
                }
                section = section.child(
                    Element::new("div")
                        .class("skill-category")
                        .child(Element::new("h3").child(category.as_str()))
                        .child(list),
                );
            }
            Ok(section.into())
        })
    }
}

/// One skill with its level bar
struct SkillCard<'a>(&'a Skill);

impl SkillCard<'_> {
    fn level_percent(proficiency: Proficiency) -> Option<u8> {
        match proficiency {
            Proficiency::Beginner => Some(25),
            Proficiency::Intermediate => Some(50),
            Proficiency::Advanced => Some(75),
            Proficiency::Expert => Some(100),
            Proficiency::Unknown => None,
        }
    }
}

impl Component for SkillCard<'_> {
    fn name(&self) -> &str {
        "SkillCard"
    }

    fn render(&self) -> Result<View, RenderError> {
        let skill = self.0;
        let percent = Self::level_percent(skill.proficiency).ok_or_else(|| {
            RenderError::new(format!("skill '{}' has an unknown proficiency level", skill.name))
        })?;

        Ok(Element::new("div")
            .class("skill")
            .child(Element::new("span").class("skill-name").child(skill.name.as_str()))
            .child(
                Element::new("span")
                    .class("skill-level")
                    .child(skill.proficiency.as_str()),
            )
            .child(
                Element::new("div")
                    .class("skill-bar")
                    .attr("style", format!("width: {percent}%")),
            )
            .into())
    }
}

// ----------------------------------------------------------------------------
// Projects
// ----------------------------------------------------------------------------

/// Project cards in display order
#[derive(Debug, Clone, Default)]
pub struct ProjectsSection {
    projects: Loadable<Vec<Project>>,
}

impl ProjectsSection {
    /// Section in the loading state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load state
    #[must_use]
    pub fn projects(&self) -> &Loadable<Vec<Project>> {
        &self.projects
    }

    /// Fetch projects
    pub async fn load(&mut self, api: &ApiService) {
        self.projects = Loadable::Loading;
        self.projects = match api.projects().list().await {
            Ok(projects) => {
                debug!(count = projects.len(), "Projects loaded");
                Loadable::Loaded(projects)
            }
            Err(e) => {
                error!(status = e.status, error = %e, "Error fetching projects");
                Loadable::Failed(PROJECTS_LOAD_ERROR.to_string())
            }
        };
    }

    /// Record a click on a project card.
    ///
    /// Returns the project so the caller can follow its link. Tracking never
    /// fails; unknown ids are ignored.
    pub async fn open(&self, api: &ApiService, project_id: &str) -> Option<&Project> {
        let project = self
            .projects
            .value()?
            .iter()
            .find(|project| project.id == project_id)?;
        api.analytics()
            .track_project_click(&project.id, &project.title)
            .await;
        Some(project)
    }
}

impl Component for ProjectsSection {
    fn render(&self) -> Result<View, RenderError> {
        self.projects.render_with(|projects| {
            let cards = projects.iter().map(project_card);
            Ok(Element::new("section")
                .attr("id", "projects")
                .children(cards)
                .into())
        })
    }
}

fn project_card(project: &Project) -> Element {
    let mut card = Element::new("article")
        .class("project-card")
        .attr("data-project-id", project.id.as_str())
        .child(Element::new("h3").child(project.title.as_str()))
        .child(Element::new("p").child(project.description.as_str()));

    if !project.tech_stack.is_empty() {
        card = card.child(
            Element::new("ul").class("tech-stack").children(
                project
                    .tech_stack
                    .iter()
                    .map(|tech| Element::new("li").child(tech.as_str())),
            ),
        );
    }

    for (label, link) in [("GitHub", &project.github_link), ("Live Demo", &project.live_link)] {
        if let Some(url) = link {
            card = card.child(Element::new("a").attr("href", url.as_str()).child(label));
        }
    }
    card
}

// ----------------------------------------------------------------------------
// Page views
// ----------------------------------------------------------------------------

/// Sends one page view per navigation
#[derive(Debug, Clone, Default)]
pub struct PageTracker {
    current: Option<String>,
}

impl PageTracker {
    /// Section in the loading state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page last recorded
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Record `page` if it differs from the current one. Returns whether a
    /// view was sent.
    pub async fn navigate(&mut self, api: &ApiService, page: &str) -> bool {
        if self.current.as_deref() == Some(page) {
            return false;
        }
        self.current = Some(page.to_string());
        api.analytics().track_page_view(page).await;
        true
    }
}

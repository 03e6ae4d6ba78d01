//! Ledger subcommands and their execution against an open ledger.

use anyhow::{anyhow, Context};
use clap::Subcommand;
use serde_json::{json, Value};

use learnopoly_ledger::Ledger;
use learnopoly_store::LedgerStore;
use learnopoly_types::{CourseId, Identity, PostId};

/// Operations that run against an initialised ledger.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Create the caller's profile.
    CreateProfile {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        bio: String,
        /// Skills, repeatable or comma-separated.
        #[arg(long = "skill", value_delimiter = ',')]
        skills: Vec<String>,
    },
    /// Replace the caller's username, bio and skills.
    UpdateProfile {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long = "skill", value_delimiter = ',')]
        skills: Vec<String>,
    },
    /// Raise a profile's reputation (administrator only).
    IncreaseReputation { target: Identity, amount: u64 },
    /// Create a course owned by the caller.
    CreateCourse {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Enroll the caller in a course.
    Enroll { course: CourseId },
    /// Publish a post as the caller.
    CreatePost { content: String },
    /// Like a post.
    LikePost { post: PostId },
    /// Connect the caller with another identity (both directions).
    Connect { other: Identity },
    /// Show a profile.
    Profile { identity: Identity },
    /// Show a course.
    Course { id: CourseId },
    /// Show a post.
    Post { id: PostId },
    /// List the courses an identity enrolled in.
    Enrollments { identity: Identity },
    /// List an identity's connections.
    Connections { identity: Identity },
    /// Show record counts and the administrator.
    Summary,
}

impl LedgerCommand {
    /// Whether the command changes ledger state (and so needs `--caller`).
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateProfile { .. }
                | Self::UpdateProfile { .. }
                | Self::IncreaseReputation { .. }
                | Self::CreateCourse { .. }
                | Self::Enroll { .. }
                | Self::CreatePost { .. }
                | Self::LikePost { .. }
                | Self::Connect { .. }
        )
    }
}

/// Run one command and return its JSON result.
pub fn execute<S: LedgerStore>(
    ledger: &mut Ledger<S>,
    caller: Option<Identity>,
    command: LedgerCommand,
) -> anyhow::Result<Value> {
    let require_caller = || caller.ok_or_else(|| anyhow!("--caller is required for this command"));

    let value = match command {
        LedgerCommand::CreateProfile { username, bio, skills } => {
            let caller = require_caller()?;
            ledger.create_profile(&caller, &username, &bio, skills)?;
            json!({ "owner": caller })
        }
        LedgerCommand::UpdateProfile { username, bio, skills } => {
            let caller = require_caller()?;
            ledger.update_profile(&caller, &username, &bio, skills)?;
            json!({ "owner": caller })
        }
        LedgerCommand::IncreaseReputation { target, amount } => {
            let caller = require_caller()?;
            ledger.increase_reputation(&caller, &target, amount)?;
            json!({ "target": target, "reputation": ledger.profile(&target)?.reputation })
        }
        LedgerCommand::CreateCourse { title, description } => {
            let caller = require_caller()?;
            let id = ledger.create_course(&caller, &title, &description)?;
            json!({ "course_id": id })
        }
        LedgerCommand::Enroll { course } => {
            let caller = require_caller()?;
            ledger.enroll_in_course(&caller, course)?;
            json!({ "enrollments": ledger.user_enrollments(&caller)? })
        }
        LedgerCommand::CreatePost { content } => {
            let caller = require_caller()?;
            let id = ledger.create_post(&caller, &content)?;
            json!({ "post_id": id })
        }
        LedgerCommand::LikePost { post } => {
            let caller = require_caller()?;
            ledger.like_post(&caller, post)?;
            let likes = ledger.post(post)?.map(|p| p.likes).unwrap_or_default();
            json!({ "post_id": post, "likes": likes })
        }
        LedgerCommand::Connect { other } => {
            let caller = require_caller()?;
            ledger.add_connection(&caller, &other)?;
            json!({ "connections": ledger.user_connections(&caller)? })
        }
        LedgerCommand::Profile { identity } => serde_json::to_value(ledger.profile(&identity)?)?,
        LedgerCommand::Course { id } => {
            let course = ledger.course(id)?.with_context(|| format!("course {id} not found"))?;
            serde_json::to_value(course)?
        }
        LedgerCommand::Post { id } => {
            let post = ledger.post(id)?.with_context(|| format!("post {id} not found"))?;
            serde_json::to_value(post)?
        }
        LedgerCommand::Enrollments { identity } => {
            serde_json::to_value(ledger.user_enrollments(&identity)?)?
        }
        LedgerCommand::Connections { identity } => {
            serde_json::to_value(ledger.user_connections(&identity)?)?
        }
        LedgerCommand::Summary => serde_json::to_value(ledger.summary()?)?,
    };
    Ok(value)
}

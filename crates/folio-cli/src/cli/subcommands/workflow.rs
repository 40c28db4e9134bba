use clap::Subcommand;

/// Workflow commands. `--as` names the acting user.
#[derive(Clone, Debug, Subcommand)]
pub enum WorkflowCommands {
    /// Move an entry to another status.
    Transition {
        entry: String,
        /// draft, in_review, ready_for_approval, approved, published, rejected
        to: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Submit a draft for review.
    Review {
        entry: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Approve an entry.
    Approve {
        entry: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject an entry.
    Reject {
        entry: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Publish an entry.
    Publish {
        entry: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Statuses the user can move the entry to.
    Next {
        entry: String,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Status history of an entry.
    History { entry: String },
    /// Comment on an entry.
    Comment {
        entry: String,
        text: String,
        #[arg(long = "as")]
        as_user: String,
        #[arg(long)]
        private: bool,
    },
    /// List comments on an entry.
    Comments {
        entry: String,
        #[arg(long)]
        include_private: bool,
    },
    /// Assign an entry to a user.
    Assign {
        entry: String,
        #[arg(long)]
        to: String,
        #[arg(long = "as")]
        as_user: String,
        /// RFC 3339 timestamp or YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
    },
    /// Assignments given to a user.
    Assignments {
        #[arg(long = "as")]
        as_user: String,
        /// pending or completed
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark an assignment completed.
    Complete { id: String },
    /// Entries in a status.
    ByStatus {
        status: String,
        #[arg(long = "type")]
        content_type: Option<String>,
    },
    /// Entry counts per status for a content type.
    Stats { content_type: String },
    /// List the transition table.
    Transitions,
    /// Allow a role to make a transition.
    AddTransition {
        from: String,
        to: String,
        role: String,
    },
}

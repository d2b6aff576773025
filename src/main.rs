mod domain;
mod error;
mod persistence;
mod render;
mod roadmap;
mod store;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use domain::{today, RoadmapScale, Status, TaskPatch};
use persistence::{
    ensure_dir, get_kanban_dir, init_local_kanban, Backend, FileBackend, MemoryBackend,
    COMPACT_VIEW_KEY, PROJECTS_KEY,
};
use std::fs;
use std::path::PathBuf;
use store::{ArchiveOutcome, ImportOutcome, ProjectStore};

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "A local multi-project kanban board with a milestone roadmap", long_about = None)]
struct Cli {
    /// Board directory. Defaults to the nearest .kanban, then ~/.kanban
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Run the command without writing anything back
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .kanban directory in the current directory
    Init,
    /// Show the current project's board
    Show {
        /// Only show tasks matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List all projects
    Projects,
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks of the current project
    #[command(subcommand)]
    Task(TaskCommand),
    /// Remove every completed task from the current project
    Archive,
    /// Replace the current project's tasks with the sample tasks
    Reset,
    /// Manage milestones of the current project
    #[command(subcommand)]
    Milestone(MilestoneCommand),
    /// Show the roadmap of the current project
    Roadmap {
        /// Change the roadmap scale before showing it
        #[arg(short, long, value_enum)]
        scale: Option<ScaleArg>,
    },
    /// Show tasks grouped by due date
    Timeline {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Collapse or expand a board column
    Collapse {
        #[arg(value_enum)]
        column: StatusArg,
    },
    /// Turn compact display on or off
    Compact {
        #[arg(value_enum)]
        mode: Toggle,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project and switch to it
    New { name: String },
    /// Switch to another project by id
    Switch { id: String },
    /// Rename the current project
    Rename { name: String },
    /// Delete the current project
    Delete {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
    /// Export the current project as JSON
    Export {
        /// Output file. Defaults to kanban-<name>.json in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a project export or an array of tasks
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task
    Add(TaskFields),
    /// Edit a task
    Edit {
        id: String,
        #[command(flatten)]
        fields: TaskEditFields,
    },
    /// Move a task to another column
    Move {
        id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Delete a task
    Rm { id: String },
    /// List tasks, optionally filtered
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Args)]
struct TaskFields {
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<String>,
    #[arg(short, long, value_enum, default_value = "todo")]
    status: StatusArg,
}

#[derive(Args)]
struct TaskEditFields {
    #[arg(short, long)]
    title: Option<String>,
    #[arg(short, long)]
    description: Option<String>,
    /// Due date (YYYY-MM-DD); pass an empty string to clear it
    #[arg(long)]
    due: Option<String>,
    #[arg(short, long, value_enum)]
    status: Option<StatusArg>,
}

#[derive(Subcommand)]
enum MilestoneCommand {
    /// Add a milestone
    Add {
        title: String,
        /// Date (YYYY-MM-DD)
        date: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Replace a milestone's title, date and description
    Edit {
        id: String,
        title: String,
        date: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a milestone
    Rm { id: String },
    /// List milestones
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Todo,
    Inprogress,
    Pending,
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Todo => Status::Todo,
            StatusArg::Inprogress => Status::InProgress,
            StatusArg::Pending => Status::Pending,
            StatusArg::Done => Status::Done,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Weeks,
    Months,
    Quarters,
}

impl From<ScaleArg> for RoadmapScale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Weeks => RoadmapScale::Weeks,
            ScaleArg::Months => RoadmapScale::Months,
            ScaleArg::Quarters => RoadmapScale::Quarters,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Some(Commands::Init) => {
            let kanban_dir = init_local_kanban()?;
            println!("Initialized board directory: {}", kanban_dir.display());
            println!("kanban will now keep this directory's projects here.");
            return Ok(());
        }
        Some(command) => command,
        None => Commands::Show { search: None },
    };

    let dir = match cli.dir {
        Some(dir) => dir,
        None => get_kanban_dir()?,
    };
    tracing::debug!(dir = %dir.display(), "using board directory");

    if cli.dry_run {
        let mut store = ProjectStore::load(scratch_copy(&FileBackend::new(dir))?);
        run(&mut store, command)
    } else {
        ensure_dir(&dir)?;
        let mut store = ProjectStore::load(FileBackend::new(dir));
        run(&mut store, command)
    }
}

/// In-memory copy of both slots; the board directory is only read
fn scratch_copy(files: &FileBackend) -> Result<MemoryBackend> {
    let mut scratch = MemoryBackend::new();
    for key in [PROJECTS_KEY, COMPACT_VIEW_KEY] {
        if let Some(value) = files.read(key)? {
            scratch.write(key, &value)?;
        }
    }
    Ok(scratch)
}

fn run<B: Backend>(store: &mut ProjectStore<B>, command: Commands) -> Result<()> {
    match command {
        // Handled in main before any board is loaded
        Commands::Init => {}
        Commands::Show { search } => {
            if let Some(term) = search {
                store.set_search_term(&term);
            }
            print_board(store);
        }
        Commands::Projects => {
            print!("{}", render::render_projects(store.projects(), store.current_project_id()));
        }
        Commands::Project(cmd) => run_project(store, cmd)?,
        Commands::Task(cmd) => run_task(store, cmd)?,
        Commands::Archive => match store.archive_completed() {
            ArchiveOutcome::NoTasks => println!("Non ci sono attività da archiviare in questo progetto."),
            ArchiveOutcome::NothingToArchive => {
                println!("Non ci sono attività nello stato 'Completato' da archiviare.")
            }
            ArchiveOutcome::Archived(n) => println!("Archiviate {} attività completate.", n),
        },
        Commands::Reset => {
            store.reset_to_sample();
            println!("Ripristinato l'esempio iniziale nel progetto corrente.");
        }
        Commands::Milestone(cmd) => run_milestone(store, cmd)?,
        Commands::Roadmap { scale } => {
            if let Some(scale) = scale {
                store.set_roadmap_scale(scale.into());
            }
            println!("Scala: {}", store.roadmap_scale().key());
            print!("{}", render::render_roadmap(&store.roadmap(today())));
        }
        Commands::Timeline { search } => {
            if let Some(term) = search {
                store.set_search_term(&term);
            }
            print!("{}", render::render_timeline(&store.timeline()));
        }
        Commands::Collapse { column } => {
            store.toggle_column(column.into());
            print_board(store);
        }
        Commands::Compact { mode } => {
            store.set_compact_view(matches!(mode, Toggle::On));
        }
    }
    Ok(())
}

fn run_project<B: Backend>(store: &mut ProjectStore<B>, cmd: ProjectCommand) -> Result<()> {
    match cmd {
        ProjectCommand::New { name } => match store.create_project(&name) {
            Some(id) => println!("Creato progetto {}", id),
            None => anyhow::bail!("Project name must not be empty"),
        },
        ProjectCommand::Switch { id } => {
            if store.current_project_id() != id && !store.switch_to(&id) {
                anyhow::bail!("Unknown project: {}", id);
            }
            print_board(store);
        }
        ProjectCommand::Rename { name } => {
            if !store.rename_current(&name) {
                anyhow::bail!("Project name must not be empty");
            }
        }
        ProjectCommand::Delete { yes } => {
            let name = store.current_project().display_name().to_string();
            if !yes {
                anyhow::bail!("Deleting \"{}\" loses all its tasks; pass --yes to confirm", name);
            }
            store.delete_current()?;
            println!("Eliminato progetto \"{}\"; ora attivo: {}", name, store.current_project_id());
        }
        ProjectCommand::Export { output } => {
            let json = store.export_current()?;
            let path = output.unwrap_or_else(|| PathBuf::from(store.export_file_name()));
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Esportato in {}", path.display());
        }
        ProjectCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match store.import_project(&text)? {
                ImportOutcome::Project { id, name } => {
                    println!("Progetto importato come \"{}\" ({}).", name, id)
                }
                ImportOutcome::Tasks { count } => {
                    println!("{} attività importate nel progetto corrente.", count)
                }
            }
        }
    }
    Ok(())
}

fn run_task<B: Backend>(store: &mut ProjectStore<B>, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add(fields) => {
            let id = store
                .add_task(
                    &fields.title,
                    &fields.description,
                    fields.due.as_deref(),
                    fields.status.into(),
                )
                .context("Task title must not be empty")?;
            println!("Aggiunta attività {}", id);
        }
        TaskCommand::Edit { id, fields } => {
            let patch = TaskPatch {
                title: fields.title,
                description: fields.description,
                status: fields.status.map(Into::into),
                due_date: fields.due.map(Some),
            };
            if store.begin_edit(&id).is_none() {
                anyhow::bail!("Unknown task: {}", id);
            }
            store.update_task(&id, patch);
            store.cancel_edit();
        }
        TaskCommand::Move { id, status } => {
            if !store.move_task(&id, Some(status.into())) {
                anyhow::bail!("Unknown task: {}", id);
            }
        }
        TaskCommand::Rm { id } => {
            if !store.delete_task(&id) {
                anyhow::bail!("Unknown task: {}", id);
            }
        }
        TaskCommand::List { search } => {
            if let Some(term) = search {
                store.set_search_term(&term);
            }
            for task in store.visible_tasks() {
                println!(
                    "[{}] {} · {} · {}",
                    task.id,
                    task.title,
                    domain::status_label(task.status),
                    task.due_date.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn run_milestone<B: Backend>(store: &mut ProjectStore<B>, cmd: MilestoneCommand) -> Result<()> {
    match cmd {
        MilestoneCommand::Add {
            title,
            date,
            description,
        } => {
            let id = store.add_milestone(&title, &date, &description)?;
            println!("Aggiunta milestone {}", id);
        }
        MilestoneCommand::Edit {
            id,
            title,
            date,
            description,
        } => {
            if !store.update_milestone(&id, &title, &date, &description)? {
                anyhow::bail!("Unknown milestone: {}", id);
            }
        }
        MilestoneCommand::Rm { id } => {
            if !store.delete_milestone(&id) {
                anyhow::bail!("Unknown milestone: {}", id);
            }
        }
        MilestoneCommand::List => print!("{}", render::render_milestones(store.milestones())),
    }
    Ok(())
}

fn print_board<B: Backend>(store: &ProjectStore<B>) {
    let project = store.current_project();
    println!("{} ({})", project.display_name(), project.id);
    let term = &store.session().search_term;
    if !term.is_empty() {
        println!("Filtro: \"{}\"", term);
    }
    let columns: Vec<_> = Status::all()
        .iter()
        .map(|status| (*status, store.column(*status)))
        .collect();
    print!(
        "{}",
        render::render_board(&columns, store.column_state(), store.compact_view())
    );
}

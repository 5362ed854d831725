//! Interactive menu over any line-oriented input and output.
//!
//! Domain errors are printed as `Error: ...` and the menu carries on. End of
//! input at any prompt ends the session with a goodbye.

use std::io::{self, BufRead, Write};

use todolist_core::error::CoreError;
use todolist_core::service::ProjectStatistics;
use todolist_core::task::{NewTask, TaskUpdate};
use todolist_core::types::{today, Date, DbId};
use todolist_core::validation::{parse_deadline, parse_status};

use crate::cli::Services;

const MAIN_MENU: &str = "
=== ToDoList ===
1. Project management
2. Task management
3. Reports
0. Exit";

const PROJECT_MENU: &str = "
--- Project management ---
1. Create project
2. List projects
3. Update project
4. Delete project
0. Back";

const TASK_MENU: &str = "
--- Task management ---
1. Create task
2. List tasks
3. Update task
4. Change task status
5. Delete task
0. Back";

const REPORT_MENU: &str = "
--- Reports ---
1. Statistics
2. Tasks grouped by status
3. Run auto-close now
0. Back";

pub const GOODBYE: &str = "Goodbye!";

#[derive(Debug, thiserror::Error)]
enum ConsoleError {
    #[error("end of input")]
    Eof,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

type Step = Result<(), ConsoleError>;

/// Menu-driven session reading commands from `input` and writing to `output`.
pub struct Console<R, W> {
    services: Services,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        match self.main_menu().await {
            Ok(()) | Err(ConsoleError::Eof) => {}
            Err(ConsoleError::Io(e)) => return Err(e),
            Err(ConsoleError::Core(e)) => writeln!(self.output, "Error: {e}")?,
        }
        writeln!(self.output, "{GOODBYE}")?;
        self.output.flush()
    }

    // -----------------------------------------------------------------------
    // Menus
    // -----------------------------------------------------------------------

    async fn main_menu(&mut self) -> Step {
        loop {
            match self.choose(MAIN_MENU)?.as_str() {
                "1" => self.project_menu().await?,
                "2" => self.task_menu().await?,
                "3" => self.report_menu().await?,
                "0" => return Ok(()),
                _ => self.invalid_option()?,
            }
        }
    }

    async fn project_menu(&mut self) -> Step {
        loop {
            let outcome = match self.choose(PROJECT_MENU)?.as_str() {
                "1" => self.create_project().await,
                "2" => self.list_projects().await,
                "3" => self.update_project().await,
                "4" => self.delete_project().await,
                "0" => return Ok(()),
                _ => self.invalid_option(),
            };
            self.report(outcome)?;
        }
    }

    async fn task_menu(&mut self) -> Step {
        loop {
            let outcome = match self.choose(TASK_MENU)?.as_str() {
                "1" => self.create_task().await,
                "2" => self.list_tasks().await,
                "3" => self.update_task().await,
                "4" => self.change_task_status().await,
                "5" => self.delete_task().await,
                "0" => return Ok(()),
                _ => self.invalid_option(),
            };
            self.report(outcome)?;
        }
    }

    async fn report_menu(&mut self) -> Step {
        loop {
            let outcome = match self.choose(REPORT_MENU)?.as_str() {
                "1" => self.statistics().await,
                "2" => self.tasks_by_status().await,
                "3" => self.autoclose_now().await,
                "0" => return Ok(()),
                _ => self.invalid_option(),
            };
            self.report(outcome)?;
        }
    }

    /// Print a domain error and keep going; anything else ends the session.
    fn report(&mut self, outcome: Step) -> Step {
        match outcome {
            Err(ConsoleError::Core(e)) => {
                writeln!(self.output, "Error: {e}")?;
                Ok(())
            }
            other => other,
        }
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    async fn create_project(&mut self) -> Step {
        let name = self.prompt("Project name: ")?;
        let description = self.prompt("Project description: ")?;
        let project = self
            .services
            .projects
            .create_project(&name, &description)
            .await?;
        writeln!(self.output, "Project created: [{}] {}", project.id, project.name)?;
        Ok(())
    }

    async fn list_projects(&mut self) -> Step {
        let projects = self.services.projects.list_projects().await?;
        if projects.is_empty() {
            writeln!(self.output, "No projects found.")?;
            return Ok(());
        }
        writeln!(self.output, "--- Projects ---")?;
        for project in &projects {
            writeln!(self.output, "{project}")?;
        }
        Ok(())
    }

    async fn update_project(&mut self) -> Step {
        let id = self.prompt_id("Project id: ")?;
        let current = self.services.projects.get_project(id).await?;

        let name = self.prompt(&format!("New name [{}]: ", current.name))?;
        let description = self.prompt(&format!("New description [{}]: ", current.description))?;
        let name = keep_if_blank(name, &current.name);
        let description = keep_if_blank(description, &current.description);

        let project = self
            .services
            .projects
            .update_project(id, &name, &description)
            .await?;
        writeln!(self.output, "Project updated: [{}] {}", project.id, project.name)?;
        Ok(())
    }

    async fn delete_project(&mut self) -> Step {
        let id = self.prompt_id("Project id: ")?;
        self.services.projects.delete_project(id).await?;
        writeln!(self.output, "Project {id} deleted with all its tasks.")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    async fn create_task(&mut self) -> Step {
        let project_id = self.prompt_id("Project id: ")?;
        let title = self.prompt("Task title: ")?;
        let description = self.prompt("Task description: ")?;
        let status = self.prompt("Status (todo/doing/done) [todo]: ")?;
        let deadline = self.prompt("Deadline (YYYY-MM-DD, blank for none): ")?;

        let input = NewTask {
            title,
            description,
            status: if status.is_empty() {
                Default::default()
            } else {
                parse_status(&status)?
            },
            deadline: optional_date(&deadline)?,
        };
        let task = self.services.tasks.create_task(project_id, input).await?;
        writeln!(self.output, "Task created: {task}")?;
        Ok(())
    }

    async fn list_tasks(&mut self) -> Step {
        let project_id = self.prompt_id("Project id: ")?;
        let filter = self.prompt("Status filter (todo/doing/done, blank for all): ")?;
        let tasks = self
            .services
            .tasks
            .list_tasks_by_name(project_id, Some(&filter))
            .await?;
        if tasks.is_empty() {
            writeln!(self.output, "No tasks found.")?;
            return Ok(());
        }
        for task in &tasks {
            writeln!(self.output, "{task}")?;
        }
        Ok(())
    }

    async fn update_task(&mut self) -> Step {
        let project_id = self.prompt_id("Project id: ")?;
        let task_id = self.prompt_id("Task id: ")?;
        let current = self.services.tasks.get_task(project_id, task_id).await?;

        let title = self.prompt(&format!("New title [{}]: ", current.title))?;
        let description = self.prompt(&format!("New description [{}]: ", current.description))?;
        let status = self.prompt(&format!("New status [{}]: ", current.status))?;
        let shown = current
            .deadline
            .map_or_else(|| "none".to_string(), |d| d.to_string());
        let deadline = self.prompt(&format!("New deadline (YYYY-MM-DD, '-' to clear) [{shown}]: "))?;

        let update = TaskUpdate {
            title: non_blank(title),
            description: non_blank(description),
            status: non_blank(status).map(|s| parse_status(&s)).transpose()?,
            deadline: match deadline.as_str() {
                "" => None,
                "-" => Some(None),
                raw => Some(Some(parse_deadline(raw)?)),
            },
        };
        if update.is_empty() {
            writeln!(self.output, "Nothing to update.")?;
            return Ok(());
        }

        let task = self
            .services
            .tasks
            .update_task(project_id, task_id, update)
            .await?;
        writeln!(self.output, "Task updated: {task}")?;
        Ok(())
    }

    async fn change_task_status(&mut self) -> Step {
        let project_id = self.prompt_id("Project id: ")?;
        let task_id = self.prompt_id("Task id: ")?;
        let status = self.prompt("New status (todo/doing/done): ")?;
        let task = self
            .services
            .tasks
            .change_task_status_str(project_id, task_id, &status)
            .await?;
        writeln!(self.output, "Task status changed: {task}")?;
        Ok(())
    }

    async fn delete_task(&mut self) -> Step {
        let project_id = self.prompt_id("Project id: ")?;
        let task_id = self.prompt_id("Task id: ")?;
        self.services.tasks.delete_task(project_id, task_id).await?;
        writeln!(self.output, "Task {task_id} deleted.")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    async fn statistics(&mut self) -> Step {
        let stats = self.services.projects.get_project_statistics().await?;
        write_statistics(&mut self.output, &stats)?;
        Ok(())
    }

    async fn tasks_by_status(&mut self) -> Step {
        let projects = self.services.projects.list_projects().await?;
        if projects.is_empty() {
            writeln!(self.output, "No projects found.")?;
            return Ok(());
        }
        for project in &projects {
            writeln!(self.output, "[{}] {}", project.id, project.name)?;
            for (status, tasks) in project.tasks_by_status().iter() {
                writeln!(self.output, "  {status} ({})", tasks.len())?;
                for task in tasks {
                    writeln!(self.output, "    {task}")?;
                }
            }
        }
        Ok(())
    }

    async fn autoclose_now(&mut self) -> Step {
        let day = today();
        let closed = self.services.tasks.autoclose_overdue_tasks(day).await?;
        write_autoclose_summary(&mut self.output, closed, day)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn choose(&mut self, menu: &str) -> Result<String, ConsoleError> {
        writeln!(self.output, "{menu}")?;
        self.prompt("> ")
    }

    fn invalid_option(&mut self) -> Step {
        writeln!(self.output, "Invalid option, please choose one of the listed numbers.")?;
        Ok(())
    }

    /// Print `label` and read one trimmed line.
    fn prompt(&mut self, label: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn prompt_id(&mut self, label: &str) -> Result<DbId, ConsoleError> {
        let raw = self.prompt(label)?;
        raw.parse()
            .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid id")).into())
    }
}

/// Render [`ProjectStatistics`] as plain text.
pub fn write_statistics<W: Write>(out: &mut W, stats: &ProjectStatistics) -> io::Result<()> {
    writeln!(out, "Projects: {}/{}", stats.total_projects, stats.max_projects)?;
    writeln!(
        out,
        "Tasks: {} (max {} per project)",
        stats.total_tasks, stats.max_tasks_per_project
    )?;
    writeln!(out, "  todo:  {}", stats.tasks_by_status.todo)?;
    writeln!(out, "  doing: {}", stats.tasks_by_status.doing)?;
    writeln!(out, "  done:  {}", stats.tasks_by_status.done)
}

/// One-line result of an auto-close pass.
pub fn write_autoclose_summary<W: Write>(out: &mut W, closed: usize, day: Date) -> io::Result<()> {
    if closed > 0 {
        writeln!(out, "Auto-closed {closed} overdue task(s) for {day}.")
    } else {
        writeln!(out, "No overdue tasks found for {day}.")
    }
}

fn keep_if_blank(value: String, current: &str) -> String {
    if value.is_empty() {
        current.to_string()
    } else {
        value
    }
}

fn non_blank(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn optional_date(raw: &str) -> Result<Option<Date>, CoreError> {
    if raw.is_empty() {
        Ok(None)
    } else {
        parse_deadline(raw).map(Some)
    }
}

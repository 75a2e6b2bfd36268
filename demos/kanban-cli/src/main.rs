use std::error::Error;
use std::time::Duration;

use minipm::board::{ColumnLayout, group_by_status};
use minipm::{NewTask, Store, Syncer, TaskStatus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./kanban.db?mode=rwc".into());

    let store = Store::builder(&database_url).build().await?;

    let project = if let Some(existing) = store.projects().into_iter().next() {
        println!("reopened project \"{}\"", existing.title);
        existing
    } else {
        let created = store.add_project("Launch v1");
        store.add_task(NewTask {
            project_id: created.id.clone(),
            title: "Design landing page".into(),
            status: TaskStatus::Todo,
        });
        store.add_task(NewTask {
            project_id: created.id.clone(),
            title: "Write release notes".into(),
            status: TaskStatus::Todo,
        });
        println!("created project \"{}\"", created.title);
        created
    };

    // Simulate dragging the first todo card one column to the right
    let layout = ColumnLayout::default();
    if let Some(card) = store
        .tasks()
        .into_iter()
        .find(|t| t.status == TaskStatus::Todo)
    {
        let target = layout.resolve_drop(card.status, layout.column_width + layout.gutter);
        store.set_task_status(&card.id, target);
        println!("moved \"{}\" to {target}", card.title);
    }

    print_board(&store, &project.id);

    let stats = store.project_stats(&project.id);
    println!(
        "{}/{} done ({}%)",
        stats.done, stats.total, stats.completion_percent
    );

    let syncer = Syncer::with_delay(Duration::from_millis(300));
    syncer.perform(&store).await;

    store.flush().await?;
    Ok(())
}

fn print_board(store: &Store, project_id: &str) {
    let tasks: Vec<_> = store
        .tasks()
        .into_iter()
        .filter(|t| t.project_id == project_id)
        .collect();
    let columns = group_by_status(&tasks);
    for (status, column) in TaskStatus::COLUMNS.iter().zip(&columns) {
        println!("[{status}]");
        for task in column {
            println!("  - {}", task.title);
        }
    }
}

use super::{print_json, request};
use crate::app::App;
use crate::cli::ProjectCommand;
use anyhow::Result;
use folio_core::{FolioError, ImageFile, Project, ProjectDraft, ProjectId};
use std::path::Path;

pub(super) async fn run(app: &App, cmd: ProjectCommand, json: bool) -> Result<()> {
    match cmd {
        ProjectCommand::List => {
            let projects = request(app.content.get_projects()).await?;
            if json {
                return print_json(&projects);
            }
            if projects.is_empty() {
                println!("No projects yet");
            }
            for project in &projects {
                print_project(project);
            }
            Ok(())
        }
        ProjectCommand::Add {
            title,
            description,
            demo_url,
            tags,
            image,
        } => {
            let draft = ProjectDraft::new(title, description, demo_url).with_tags(&tags);
            let file = read_image(&image).await?;
            let project = request(app.content.add_project(&draft, Some(file))).await?;
            report(&project, json, "Added")
        }
        ProjectCommand::Update {
            id,
            title,
            description,
            demo_url,
            add_tags,
            remove_tags,
            image,
        } => {
            let current = find(app, id).await?;
            let mut draft = ProjectDraft::from(&current);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(demo_url) = demo_url {
                draft.demo_url = demo_url;
            }
            for tag in &remove_tags {
                draft.remove_tag(tag);
            }
            for tag in &add_tags {
                draft.add_tag(tag);
            }

            let file = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            let project = request(app.content.update_project(id, &draft, file)).await?;
            report(&project, json, "Updated")
        }
        ProjectCommand::Delete { id } => {
            let current = find(app, id).await?;
            let image = (!current.image.is_empty()).then_some(current.image.as_str());
            request(app.content.delete_project(id, image)).await?;
            println!("Deleted project {}", id);
            Ok(())
        }
    }
}

async fn find(app: &App, id: ProjectId) -> Result<Project> {
    let projects = request(app.content.get_projects()).await?;
    projects
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| {
            let err = FolioError::NotFound {
                what: "project",
                id: id.to_string(),
            };
            anyhow::anyhow!(err.user_message())
        })
}

async fn read_image(path: &Path) -> Result<ImageFile> {
    ImageFile::from_path(path)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn report(project: &Project, json: bool, verb: &str) -> Result<()> {
    if json {
        return print_json(project);
    }
    println!("{} project {} '{}'", verb, project.id, project.title);
    Ok(())
}

fn print_project(project: &Project) {
    let created = project
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    println!("#{:<4} {}  [{}]", project.id, project.title, created);
    println!("      {}", project.demo_url);
    if !project.tags.is_empty() {
        println!("      tags: {}", project.tags.join(", "));
    }
}

//! Demo data for a fresh data directory.

use buildwise_core::{Project, ProjectMember, ProjectStatus, User, UserRole};
use buildwise_costing::format_usd;
use buildwise_storage::{Result, Storage};
use tracing::info;

const USERS: [(&str, &str, UserRole); 4] = [
    ("john.manager@construction.com", "John Smith", UserRole::ProjectManager),
    ("sarah.foreman@construction.com", "Sarah Johnson", UserRole::Foreman),
    ("mike.operator@construction.com", "Mike Wilson", UserRole::Operator),
    ("lisa.inspector@construction.com", "Lisa Davis", UserRole::SafetyInspector),
];

/// What [`seed`] created.
#[derive(Debug, Clone)]
pub struct Seeded {
    /// Users, project manager first
    pub users: Vec<User>,
    /// The demo project
    pub project: Project,
}

/// Create the demo users and the "Downtown Office Complex" project owned
/// by the project manager, with the rest of the crew as members.
pub async fn seed(storage: &mut dyn Storage) -> Result<Seeded> {
    info!("Creating users...");
    let mut users = Vec::with_capacity(USERS.len());
    for (email, name, role) in USERS {
        let user = User::new(email, Some(name.to_string()), role);
        storage.save_user(&user).await?;
        users.push(user);
    }

    info!("Creating projects...");
    let manager = &users[0];
    let mut project = Project::new("Downtown Office Complex", manager.id);
    project.description = Some("Modern 15-story office building with underground parking".to_string());
    project.status = ProjectStatus::InProgress;
    project.budget = Some(2_500_000.0);
    project.actual_cost = 1_800_000.0;
    project.address = Some("123 Main Street, Downtown".to_string());
    storage.save_project(&project).await?;

    for user in &users[1..] {
        storage.save_project_member(&ProjectMember::new(project.id, user.id)).await?;
    }

    storage.commit("Seed demo data").await?;
    info!(
        "Created {} users and 1 project ({} budget)",
        users.len(),
        format_usd(project.budget)
    );
    Ok(Seeded { users, project })
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_storage::MemoryStorage;

    #[tokio::test]
    async fn test_seed() {
        let mut storage = MemoryStorage::new();
        let seeded = seed(&mut storage).await.unwrap();

        assert_eq!(seeded.users.len(), 4);
        assert_eq!(seeded.users[0].role, UserRole::ProjectManager);
        assert_eq!(seeded.project.owner_id, seeded.users[0].id);

        let projects = storage.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].status, ProjectStatus::InProgress);
        assert_eq!(projects[0].actual_cost, 1_800_000.0);
        assert_eq!(storage.list_project_members(seeded.project.id).await.unwrap().len(), 3);
    }
}

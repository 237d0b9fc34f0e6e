use std::collections::BTreeSet;

use logdeck_application::{PageRequest, RoleStore};
use logdeck_core::{AppError, AppResult};
use serde_json::{Value, json};

pub const USAGE: &str = "usage: logdeck-console <command>\n\
    \n\
    commands:\n\
    \x20 roles [page] [query]\n\
    \x20 role <id>\n\
    \x20 role-users <id> [page] [query]\n\
    \x20 user-roles <username> [page] [query]\n\
    \x20 add-members <id> <user>...\n\
    \x20 remove-member <id> <username>\n\
    \x20 delete <id>";

/// One role administration command parsed from argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roles { page: PageRequest },
    Role { role_id: String },
    RoleUsers { role_id: String, page: PageRequest },
    UserRoles { username: String, page: PageRequest },
    AddMembers { role_id: String, usernames: BTreeSet<String> },
    RemoveMember { role_id: String, username: String },
    Delete { role_id: String },
}

impl Command {
    /// Parses arguments following the program name.
    pub fn parse(args: &[String], per_page: u64) -> AppResult<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Err(AppError::Validation("missing command".to_owned()));
        };

        match name.as_str() {
            "roles" => Ok(Self::Roles {
                page: page_request(rest, per_page)?,
            }),
            "role" => {
                let [role_id] = rest else {
                    return Err(arity("role <id>"));
                };
                Ok(Self::Role {
                    role_id: role_id.clone(),
                })
            }
            "role-users" => {
                let Some((role_id, rest)) = rest.split_first() else {
                    return Err(arity("role-users <id> [page] [query]"));
                };
                Ok(Self::RoleUsers {
                    role_id: role_id.clone(),
                    page: page_request(rest, per_page)?,
                })
            }
            "user-roles" => {
                let Some((username, rest)) = rest.split_first() else {
                    return Err(arity("user-roles <username> [page] [query]"));
                };
                Ok(Self::UserRoles {
                    username: username.clone(),
                    page: page_request(rest, per_page)?,
                })
            }
            "add-members" => {
                let Some((role_id, usernames)) = rest.split_first() else {
                    return Err(arity("add-members <id> <user>..."));
                };
                if usernames.is_empty() {
                    return Err(arity("add-members <id> <user>..."));
                }
                Ok(Self::AddMembers {
                    role_id: role_id.clone(),
                    usernames: usernames.iter().cloned().collect(),
                })
            }
            "remove-member" => {
                let [role_id, username] = rest else {
                    return Err(arity("remove-member <id> <username>"));
                };
                Ok(Self::RemoveMember {
                    role_id: role_id.clone(),
                    username: username.clone(),
                })
            }
            "delete" => {
                let [role_id] = rest else {
                    return Err(arity("delete <id>"));
                };
                Ok(Self::Delete {
                    role_id: role_id.clone(),
                })
            }
            other => Err(AppError::Validation(format!("unknown command '{other}'"))),
        }
    }

    /// Runs the command and returns its JSON result.
    pub async fn run(self, store: &RoleStore) -> AppResult<Value> {
        match self {
            Self::Roles { page } => to_json(&store.load_roles_paginated(&page).await?),
            Self::Role { role_id } => to_json(&store.load(role_id.as_str()).await?),
            Self::RoleUsers { role_id, page } => {
                let role = store.load(role_id.as_str()).await?;
                to_json(
                    &store
                        .load_users_for_role(role_id.as_str(), role.name(), &page)
                        .await?,
                )
            }
            Self::UserRoles { username, page } => {
                to_json(&store.load_roles_for_user(username.as_str(), &page).await?)
            }
            Self::AddMembers { role_id, usernames } => {
                to_json(&store.add_members(role_id.as_str(), &usernames).await?)
            }
            Self::RemoveMember { role_id, username } => to_json(
                &store
                    .remove_member(role_id.as_str(), username.as_str())
                    .await?,
            ),
            Self::Delete { role_id } => {
                store.delete(role_id.as_str()).await?;
                Ok(json!({ "deleted": role_id }))
            }
        }
    }
}

fn page_request(args: &[String], per_page: u64) -> AppResult<PageRequest> {
    let page = match args.first() {
        Some(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid page '{value}': {error}"))
        })?,
        None => 1,
    };
    if page == 0 {
        return Err(AppError::Validation("page must be at least 1".to_owned()));
    }

    let query = args.get(1..).map(|words| words.join(" ")).unwrap_or_default();
    Ok(PageRequest::new(page, per_page, query))
}

fn arity(usage: &str) -> AppError {
    AppError::Validation(format!("expected: {usage}"))
}

fn to_json(value: &impl serde::Serialize) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to serialize result: {error}")))
}

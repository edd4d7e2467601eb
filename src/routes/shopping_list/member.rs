use axum::{
	body::Bytes,
	extract::{Path, State},
	Json,
};

use super::{get_request_user, parse_body, parse_id};
use crate::{
	models::{
		shopping_list::{ListMemberRole, UpdateMembersRequest},
		user::PublicUser,
	},
	prelude::*,
	utils::extractors::AuthenticatedUser,
};

/// Lists the editors of a list
#[instrument(skip(state))]
pub async fn list_editors(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	list_members(&state, &auth, &list_id, ListMemberRole::Editor).await
}

/// Replaces the editors of a list
#[instrument(skip(state, body))]
pub async fn update_editors(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
	body: Bytes,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	replace_members(&state, &auth, &list_id, ListMemberRole::Editor, &body).await
}

/// Lists the viewers of a list
#[instrument(skip(state))]
pub async fn list_viewers(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	list_members(&state, &auth, &list_id, ListMemberRole::Viewer).await
}

/// Replaces the viewers of a list
#[instrument(skip(state, body))]
pub async fn update_viewers(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
	body: Bytes,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	replace_members(&state, &auth, &list_id, ListMemberRole::Viewer, &body).await
}

/// Anyone who can see a list can see who else has a role on it
async fn list_members(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: &str,
	role: ListMemberRole,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	let list_id = parse_id(list_id)?;

	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, auth).await?;

	service::get_shopping_list_for_user(&mut connection, list_id, user.id).await?;
	let members = db::get_shopping_list_members(&mut connection, list_id, role).await?;

	Ok(Json(members))
}

/// Only the owner of a list can change who has a role on it. Every username
/// must belong to a user, and the owner can't give themselves a role.
async fn replace_members(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: &str,
	role: ListMemberRole,
	body: &Bytes,
) -> Result<Json<Vec<PublicUser>>, ErrorType> {
	let list_id = parse_id(list_id)?;
	let UpdateMembersRequest { mut usernames } = parse_body(body)?;
	usernames.sort();
	usernames.dedup();

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, auth).await?;

	service::get_owned_shopping_list(&mut transaction, list_id, user.id).await?;

	let members = db::get_users_by_usernames(&mut transaction, &usernames).await?;
	if members.len() != usernames.len() || members.iter().any(|member| member.id == user.id) {
		return Err(ErrorType::WrongParameters);
	}

	let member_ids = members.iter().map(|member| member.id).collect::<Vec<_>>();
	db::set_shopping_list_members(&mut transaction, list_id, role, &member_ids).await?;
	let members = db::get_shopping_list_members(&mut transaction, list_id, role).await?;

	transaction.commit().await?;
	info!(
		"{} members with role {:?} set on `{}`",
		members.len(),
		role,
		list_id
	);

	Ok(Json(members))
}

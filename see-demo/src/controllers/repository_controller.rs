use axum::extract::State;
use axum::routing::post;
use axum::Router;
use see_core::HttpError;
use see_data::{EntityProvider, Repository};

use crate::models::Member;
use crate::state::AppState;

/// Insert the demo member and acknowledge with plain text.
async fn insert<P: EntityProvider<Member>>(
    State(state): State<AppState<P>>,
) -> Result<&'static str, HttpError> {
    state.members.insert(Member::new("Success Go")).await?;
    Ok("Ok")
}

pub fn routes<P: EntityProvider<Member>>() -> Router<AppState<P>> {
    Router::new().route("/repository/insert", post(insert::<P>))
}

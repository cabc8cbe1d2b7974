/**
 * Router Configuration
 *
 * One public route (`POST /auth`) and the authenticated surface behind the
 * JWT middleware. Handlers under `/posts/{id}/images/{mask}` share one
 * registration because the upload/removal mask and the served slot index
 * occupy the same path position.
 *
 * # Routes
 *
 * - `POST   /auth` - WeChat code login
 * - `GET    /posts` - paginated region listing
 * - `POST   /posts` - create post
 * - `GET    /posts/{id}` - post detail
 * - `PUT    /posts/{id}` - patch title/text
 * - `DELETE /posts/{id}` - soft delete
 * - `GET    /posts/{id}/images/{slot}` - serve an image
 * - `POST   /posts/{id}/images/{mask}` - upload images by mask
 * - `DELETE /posts/{id}/images/{mask}` - remove images by mask
 * - `GET    /posts/{id}/comments` - two-level comment tree
 * - `POST   /posts/{id}/comments?parentId=` - add root/reply comment
 * - `DELETE /posts/{id}/comments/{comment_id}` - soft delete comment
 * - `POST   /posts/{id}/votes` - vote (idempotent)
 * - `DELETE /posts/{id}/votes` - withdraw vote (idempotent)
 * - `GET    /regions` - list regions
 * - `POST   /regions/{name}` - create region (admin, optional icon)
 * - `GET    /regions/{id}/icon` - region icon
 * - `DELETE /regions/{id}` - delete region (admin)
 * - `GET    /stat` - caller's statistics
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::handlers::login;
use crate::comments::handlers as comments;
use crate::middleware::auth::auth_middleware;
use crate::posts::handlers as posts;
use crate::regions::handlers as regions;
use crate::server::state::AppState;
use crate::stats::handlers as stats;
use crate::votes::handlers as votes;

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/posts/{id}/images/{mask}",
            get(posts::get_image)
                .post(posts::upload_images)
                .delete(posts::remove_images),
        )
        .route(
            "/posts/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/posts/{id}/comments/{comment_id}",
            axum::routing::delete(comments::remove_comment),
        )
        .route(
            "/posts/{id}/votes",
            post(votes::add_vote).delete(votes::remove_vote),
        )
        .route("/regions", get(regions::list_regions))
        .route(
            "/regions/{id}",
            post(regions::create_region).delete(regions::delete_region),
        )
        .route("/regions/{id}/icon", get(regions::get_icon))
        .route("/stat", get(stats::get_stats))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/auth", post(login))
        .merge(protected)
        .fallback(|| async { "404 Not Found" })
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

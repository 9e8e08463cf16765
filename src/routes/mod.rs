pub mod auth;
pub mod blogs;
pub mod comments;
pub mod engagement;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::signup)
        .service(auth::login)
        .service(
            web::scope("/tasks")
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/blogs")
                .service(blogs::list_blogs)
                .service(blogs::create_blog),
        )
        .service(
            web::scope("/blogposts")
                .service(blogs::get_blog_post)
                .service(blogs::update_blog_post)
                .service(blogs::delete_blog_post)
                .service(comments::add_comment)
                .service(comments::list_comments)
                .service(engagement::like)
                .service(engagement::unlike)
                .service(engagement::share),
        )
        .service(web::scope("/comments").service(comments::delete_comment));
}

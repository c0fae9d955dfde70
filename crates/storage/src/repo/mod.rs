mod comments;
mod moderation;
mod posts;
mod profiles;

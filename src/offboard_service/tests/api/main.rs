mod cors;
mod delete_user;
mod health;
mod helpers;

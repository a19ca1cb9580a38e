pub mod outreach;

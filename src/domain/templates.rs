//! Built-in form templates offered when creating a new form.

use std::sync::LazyLock;

use serde::Serialize;

use crate::domain::entities::{FieldDefinition, FieldType};

#[derive(Debug, Clone, Serialize)]
pub struct FormTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub fields: Vec<FieldDefinition>,
}

pub const CATEGORIES: [&str; 8] = [
    "Contact",
    "HR",
    "Events",
    "Feedback",
    "Sales",
    "Scheduling",
    "Marketing",
    "Support",
];

static CATALOG: LazyLock<Vec<FormTemplate>> = LazyLock::new(build_catalog);

/// All templates in display order.
pub fn catalog() -> &'static [FormTemplate] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static FormTemplate> {
    CATALOG.iter().find(|template| template.id == id)
}

fn text(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(id, FieldType::ShortText, label)
}

fn long_text(id: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(id, FieldType::LongText, label)
}

fn email(label: &str) -> FieldDefinition {
    FieldDefinition::new("email", FieldType::Email, label).required()
}

fn phone() -> FieldDefinition {
    FieldDefinition::new("phone", FieldType::Phone, "Phone Number")
}

fn radio<const N: usize>(id: &str, label: &str, options: [&str; N]) -> FieldDefinition {
    FieldDefinition::new(id, FieldType::Radio, label)
        .required()
        .with_options(options)
}

fn checkbox<const N: usize>(id: &str, label: &str, options: [&str; N]) -> FieldDefinition {
    FieldDefinition::new(id, FieldType::Checkbox, label).with_options(options)
}

fn build_catalog() -> Vec<FormTemplate> {
    vec![
        FormTemplate {
            id: "contact-form",
            title: "Contact Form",
            description: "A simple contact form with name, email, and message fields",
            category: "Contact",
            fields: vec![
                text("name", "Full Name").required(),
                email("Email Address"),
                phone(),
                long_text("message", "Message").required(),
            ],
        },
        FormTemplate {
            id: "job-application",
            title: "Job Application",
            description: "Collect job applications with resume upload",
            category: "HR",
            fields: vec![
                text("name", "Full Name").required(),
                email("Email Address"),
                phone().required(),
                text("position", "Position Applied For").required(),
                long_text("experience", "Work Experience").required(),
                FieldDefinition::new("resume", FieldType::File, "Resume")
                    .required()
                    .accepting(".pdf,.doc,.docx", 5),
            ],
        },
        FormTemplate {
            id: "event-registration",
            title: "Event Registration",
            description: "Register attendees for your event",
            category: "Events",
            fields: vec![
                text("name", "Full Name").required(),
                email("Email Address"),
                radio("ticket_type", "Ticket Type", ["Standard", "VIP", "Group"]),
                FieldDefinition::new("date", FieldType::Date, "Preferred Date").required(),
                checkbox(
                    "dietary",
                    "Dietary Requirements",
                    ["Vegetarian", "Vegan", "Gluten-free", "Halal", "Kosher"],
                ),
            ],
        },
        FormTemplate {
            id: "feedback-survey",
            title: "Feedback Survey",
            description: "Collect customer feedback and suggestions",
            category: "Feedback",
            fields: vec![
                radio(
                    "rating",
                    "Overall Satisfaction",
                    [
                        "Very Satisfied",
                        "Satisfied",
                        "Neutral",
                        "Dissatisfied",
                        "Very Dissatisfied",
                    ],
                ),
                checkbox(
                    "liked",
                    "What did you like?",
                    ["Quality", "Price", "Service", "Speed", "Support"],
                )
                .required(),
                long_text("improvements", "Suggestions for Improvement"),
                radio("recommend", "Would you recommend us?", ["Yes", "No", "Maybe"]),
            ],
        },
        FormTemplate {
            id: "product-order",
            title: "Product Order Form",
            description: "Take product orders with customization options",
            category: "Sales",
            fields: vec![
                text("name", "Customer Name").required(),
                email("Email Address"),
                radio(
                    "product",
                    "Product Selection",
                    ["Basic Package", "Premium Package", "Enterprise Package"],
                ),
                text("quantity", "Quantity").required(),
                long_text("customization", "Customization Requirements"),
            ],
        },
        FormTemplate {
            id: "appointment-booking",
            title: "Appointment Booking",
            description: "Schedule appointments and consultations",
            category: "Scheduling",
            fields: vec![
                text("name", "Full Name").required(),
                email("Email Address"),
                phone().required(),
                radio(
                    "service",
                    "Service Type",
                    ["Consultation", "Follow-up", "General Appointment"],
                ),
                FieldDefinition::new("preferred_date", FieldType::Date, "Preferred Date")
                    .required(),
                long_text("notes", "Additional Notes"),
            ],
        },
        FormTemplate {
            id: "newsletter-signup",
            title: "Newsletter Signup",
            description: "Collect newsletter subscriptions with preferences",
            category: "Marketing",
            fields: vec![
                text("name", "Name").required(),
                email("Email Address"),
                checkbox(
                    "interests",
                    "Topics of Interest",
                    ["Technology", "Business", "Design", "Marketing", "Development"],
                )
                .required(),
                radio("frequency", "Email Frequency", ["Daily", "Weekly", "Monthly"]),
            ],
        },
        FormTemplate {
            id: "bug-report",
            title: "Bug Report Form",
            description: "Collect detailed bug reports from users",
            category: "Support",
            fields: vec![
                email("Your Email"),
                radio(
                    "issue_type",
                    "Issue Type",
                    ["Bug", "Feature Request", "Performance Issue", "Other"],
                ),
                long_text("description", "Issue Description").required(),
                long_text("steps", "Steps to Reproduce").required(),
                FieldDefinition::new("screenshot", FieldType::File, "Screenshot")
                    .accepting(".png,.jpg,.jpeg,.gif", 5),
            ],
        },
    ]
}

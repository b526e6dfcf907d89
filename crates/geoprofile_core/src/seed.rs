//! Built-in sample directory.
//!
//! Six US-based profiles used for first-run content, demos and tests.

use crate::model::profile::{Address, GeoLocation, Profile, ProfileId};
use std::collections::BTreeMap;

struct SampleRecord {
    id: &'static str,
    name: &'static str,
    avatar: &'static str,
    description: &'static str,
    occupation: &'static str,
    company: &'static str,
    street: &'static str,
    city: &'static str,
    state: &'static str,
    zip_code: &'static str,
    country: &'static str,
    location: (f64, f64),
    phone: &'static str,
    email: &'static str,
    website: &'static str,
    interests: &'static [&'static str],
    social_links: &'static [(&'static str, &'static str)],
}

const SAMPLES: &[SampleRecord] = &[
    SampleRecord {
        id: "1",
        name: "Emma Johnson",
        avatar: "https://randomuser.me/api/portraits/women/1.jpg",
        description: "Senior Software Engineer specializing in frontend development with React and TypeScript",
        occupation: "Software Engineer",
        company: "TechCorp Inc.",
        street: "123 Main Street",
        city: "San Francisco",
        state: "CA",
        zip_code: "94105",
        country: "USA",
        location: (37.7749, -122.4194),
        phone: "+1 (555) 123-4567",
        email: "emma.johnson@example.com",
        website: "https://emmajonson.example.com",
        interests: &["Hiking", "Photography", "Coding"],
        social_links: &[
            ("twitter", "https://twitter.com/emmaj"),
            ("linkedin", "https://linkedin.com/in/emmaj"),
        ],
    },
    SampleRecord {
        id: "2",
        name: "James Wilson",
        avatar: "https://randomuser.me/api/portraits/men/2.jpg",
        description: "UX/UI Designer with 8 years of experience creating intuitive user interfaces",
        occupation: "UX Designer",
        company: "Design Masters",
        street: "456 Market Street",
        city: "New York",
        state: "NY",
        zip_code: "10001",
        country: "USA",
        location: (40.7128, -74.006),
        phone: "+1 (555) 234-5678",
        email: "james.wilson@example.com",
        website: "https://jameswilson.example.com",
        interests: &["Design", "Travel", "Music"],
        social_links: &[
            ("twitter", "https://twitter.com/jamesw"),
            ("linkedin", "https://linkedin.com/in/jamesw"),
        ],
    },
    SampleRecord {
        id: "3",
        name: "Sophia Chen",
        avatar: "https://randomuser.me/api/portraits/women/3.jpg",
        description: "Data Scientist working on machine learning models for predictive analytics",
        occupation: "Data Scientist",
        company: "DataMind Analytics",
        street: "789 Park Avenue",
        city: "Boston",
        state: "MA",
        zip_code: "02108",
        country: "USA",
        location: (42.3601, -71.0589),
        phone: "+1 (555) 345-6789",
        email: "sophia.chen@example.com",
        website: "https://sophiachen.example.com",
        interests: &["AI Research", "Data Visualization", "Piano"],
        social_links: &[
            ("twitter", "https://twitter.com/sophiac"),
            ("linkedin", "https://linkedin.com/in/sophiac"),
        ],
    },
    SampleRecord {
        id: "4",
        name: "Michael Brown",
        avatar: "https://randomuser.me/api/portraits/men/4.jpg",
        description: "Product Manager with a background in software development and business strategy",
        occupation: "Product Manager",
        company: "InnovateTech",
        street: "101 Pine Street",
        city: "Seattle",
        state: "WA",
        zip_code: "98101",
        country: "USA",
        location: (47.6062, -122.3321),
        phone: "+1 (555) 456-7890",
        email: "michael.brown@example.com",
        website: "https://michaelbrown.example.com",
        interests: &["Product Strategy", "Hiking", "Chess"],
        social_links: &[
            ("twitter", "https://twitter.com/michaelb"),
            ("linkedin", "https://linkedin.com/in/michaelb"),
        ],
    },
    SampleRecord {
        id: "5",
        name: "Olivia Martinez",
        avatar: "https://randomuser.me/api/portraits/women/5.jpg",
        description: "Marketing Specialist focusing on digital campaigns and brand development",
        occupation: "Marketing Specialist",
        company: "BrandBoost Media",
        street: "222 Oak Street",
        city: "Austin",
        state: "TX",
        zip_code: "78701",
        country: "USA",
        location: (30.2672, -97.7431),
        phone: "+1 (555) 567-8901",
        email: "olivia.martinez@example.com",
        website: "https://oliviamartinez.example.com",
        interests: &["Content Creation", "Social Media", "Yoga"],
        social_links: &[
            ("instagram", "https://instagram.com/oliviam"),
            ("linkedin", "https://linkedin.com/in/oliviam"),
        ],
    },
    SampleRecord {
        id: "6",
        name: "William Lee",
        avatar: "https://randomuser.me/api/portraits/men/6.jpg",
        description: "DevOps Engineer specializing in cloud infrastructure and automation",
        occupation: "DevOps Engineer",
        company: "CloudScale Systems",
        street: "333 Elm Street",
        city: "Chicago",
        state: "IL",
        zip_code: "60601",
        country: "USA",
        location: (41.8781, -87.6298),
        phone: "+1 (555) 678-9012",
        email: "william.lee@example.com",
        website: "https://williamlee.example.com",
        interests: &["Cloud Computing", "Automation", "Cycling"],
        social_links: &[
            ("twitter", "https://twitter.com/williaml"),
            ("linkedin", "https://linkedin.com/in/williaml"),
        ],
    },
];

/// Returns the sample profiles in their canonical order.
pub fn sample_profiles() -> Vec<Profile> {
    SAMPLES.iter().map(to_profile).collect()
}

fn to_profile(record: &SampleRecord) -> Profile {
    let (lat, lng) = record.location;
    Profile {
        id: ProfileId::new(record.id),
        name: record.name.to_string(),
        avatar: record.avatar.to_string(),
        description: record.description.to_string(),
        address: Address {
            street: record.street.to_string(),
            city: record.city.to_string(),
            state: record.state.to_string(),
            zip_code: record.zip_code.to_string(),
            country: record.country.to_string(),
            location: GeoLocation::new(lat, lng),
        },
        phone: Some(record.phone.to_string()),
        email: Some(record.email.to_string()),
        website: Some(record.website.to_string()),
        interests: Some(record.interests.iter().map(|s| s.to_string()).collect()),
        occupation: Some(record.occupation.to_string()),
        company: Some(record.company.to_string()),
        social_links: Some(
            record
                .social_links
                .iter()
                .map(|(platform, url)| (platform.to_string(), url.to_string()))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

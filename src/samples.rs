//! Built-in sample resumes for trying the service without your own data.

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy)]
pub struct SampleResume {
    pub role: &'static str,
    pub text: &'static str,
}

pub const SAMPLE_RESUMES: [SampleResume; 3] = [
    SampleResume {
        role: "Senior Software Engineer",
        text: "John Doe
Senior Software Engineer
(555) 123-4567 | john.doe@email.com | San Francisco, CA

SUMMARY
Highly skilled Senior Software Engineer with 8+ years of experience in full-stack development. Proven track record of designing and implementing scalable web applications. Expertise in Python, JavaScript, and Cloud Technologies.

EXPERIENCE
Tech Solutions Inc. - San Francisco, CA
Senior Software Engineer | Jan 2018 - Present
- Led a team of 5 engineers in migrating a monolithic architecture to microservices, improving deployment frequency by 40%.
- Designed and built a real-time analytics dashboard using React and Node.js, handling over 100k requests per second.
- Mentored junior developers and conducted code reviews to ensure code quality and best practices.

Innovate Corp. - Austin, TX
Software Engineer | Jun 2014 - Dec 2017
- Developed and maintained critical backend services using Django and PostgreSQL.
- Optimized database queries, reducing API latency by 30%.
- Collaborated with product managers to define requirements and deliver features on time.

EDUCATION
University of Texas at Austin
B.S. in Computer Science | May 2014

SKILLS
- Languages: Python, JavaScript, Java, SQL
- Frameworks: React, Node.js, Django, Flask
- Tools: Docker, Kubernetes, AWS, Git",
    },
    SampleResume {
        role: "Product Manager",
        text: "Jane Smith
Product Manager
(555) 987-6543 | jane.smith@email.com | New York, NY

SUMMARY
Results-oriented Product Manager with 5 years of experience in B2B SaaS products. diverse background in market research, product strategy, and agile methodologies. Passionate about building products that solve real customer problems.

EXPERIENCE
SaaS Dynamics - New York, NY
Product Manager | Mar 2019 - Present
- Defined the product roadmap and strategy for a flagship CRM tool, resulting in a 25% increase in user retention.
- Conducted user research and usability testing to identify pain points and validate new feature ideas.
- Worked closely with engineering and design teams to launch 3 major product updates within one year.

Market Insights - Boston, MA
Associate Product Manager | Jul 2016 - Feb 2019
- Analyzed market trends and competitor landscape to inform product positioning.
- Managed the product backlog and prioritized user stories for sprint planning.
- Assisted in the launch of a mobile app feature that gained 10k downloads in the first month.

EDUCATION
Boston University
B.A. in Business Administration | May 2016

SKILLS
- Product Strategy, Roadmap Planning, Agile/Scrum
- Market Research, User Testing, Data Analysis
- Tools: Jira, Confluence, Figma, Google Analytics",
    },
    SampleResume {
        role: "Data Analyst",
        text: "Alex Johnson
Data Analyst
(555) 555-5555 | alex.johnson@email.com | Chicago, IL

SUMMARY
Detail-oriented Data Analyst with a strong foundation in statistics and data visualization. Proficient in SQL, Python, and Tableau. Eager to leverage analytical skills to drive business insights.

EXPERIENCE
Retail Giants - Chicago, IL
Data Analysis Intern | Jun 2023 - Aug 2023
- Analyzed sales data to identify seasonal trends and optimize inventory levels.
- Created interactive dashboards in Tableau to visualize key performance indicators (KPIs) for the marketing team.
- Automated data cleaning processes using Python scripts, saving 5 hours of manual work per week.

University Research Lab
Research Assistant | Sep 2022 - May 2023
- Collected and processed large datasets for a sociology research project.
- Performed statistical analysis using R to test hypotheses and draw conclusions.
- Presented findings at a university undergraduate research conference.

EDUCATION
University of Chicago
B.S. in Statistics | May 2024

SKILLS
- SQL, Python (Pandas, NumPy), R
- Data Visualization: Tableau, Power BI, Matplotlib
- Statistical Analysis, Data Cleaning, Excel",
    },
];

/// Pick a sample at random.
pub fn random() -> SampleResume {
    *SAMPLE_RESUMES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&SAMPLE_RESUMES[0])
}

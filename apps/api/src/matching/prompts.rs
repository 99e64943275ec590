// Match scoring LLM prompt templates.

pub const MATCH_SYSTEM: &str = "\
You are an expert job matching assistant. \
You compare one candidate resume against one job listing and score the fit honestly. \
Scores above 10 cap at 10, below 0 cap at 0.";

pub const MATCH_PROMPT_TEMPLATE: &str = r#"Analyze how well this candidate matches the job listing.

## CANDIDATE RESUME:
{resume}

## CANDIDATE MINIMUM SALARY REQUIREMENT: ${expected_salary}

## JOB LISTING:
{job_json}

---

## SCORING RUBRIC (total the points, max 10):

### 1. SALARY
- Read the salary from job_max_salary, job_min_salary, or any salary text
- Hourly rates: multiply by 2080 for an annual figure
- +2 if the job pays at least ${expected_salary}, +1 if within 10%, 0 if below

### 2. SKILLS
- +1 per core technical skill the candidate has that the job asks for (max 5)
- -1 per critical required skill the candidate is missing

### 3. EXPERIENCE
- +2 if years of experience meet or exceed the requirement, +1 if close, 0 if far under

### 4. EDUCATION
- +1 if education meets or exceeds the requirement

{honesty_instruction}

## OUTPUT
Return exactly this JSON object:
{
  "job_title": "extracted job title",
  "company": "company name",
  "employment_type": "Full-time | Part-time | Contract",
  "remote": "Yes | No",
  "salary": "salary as text, e.g. '$80,000 - $120,000'",
  "benefits": "key benefits if mentioned",
  "responsibilities": "key responsibilities, semicolon separated",
  "qualifications": "key qualifications, semicolon separated",
  "apply_links": ["up to 4 application URLs"],
  "match_score": 0,
  "match_reason": "[SALARY: ...] [SKILLS: matched X, missing Y] [EXPERIENCE: ...] [OVERALL: ...]"
}

match_score MUST be an integer from 0 to 10.
match_reason MUST cover both the salary and the skills analysis.

{json_only}"#;
